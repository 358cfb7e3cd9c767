use chrono::NaiveDate;
use common::{
    DashboardSummary, HistoricalBar, NewsArticle, NewsCard, PredictionWindow, PriceInfo, Sentiment,
    SentimentPercentage, StockListing, StockNews, StockSnapshot, SummaryDetail, TimeSeriesPoint,
};
use compute::view::{PredictionViews, ViewState};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use upstream::{NewsSearch, PredictionResponse, PredictionSource, StockDataSource};
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Stock-data backend
    pub stocks: Arc<dyn StockDataSource>,
    /// Price-prediction service
    pub predictions: Arc<dyn PredictionSource>,
    /// News search for the landing feed
    pub news: Arc<dyn NewsSearch>,
    /// Symbols searched for the landing feed, in display order
    pub news_symbols: Arc<Vec<String>>,
    /// Articles requested per feed symbol
    pub news_per_symbol: u32,
    /// Cache for upstream payloads
    pub cache: Cache<String, CachedData>,
    /// Latest prediction view per symbol
    pub views: PredictionViews,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("news_symbols", &self.news_symbols)
            .field("news_per_symbol", &self.news_per_symbol)
            .field("cached_entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Listings(Arc<Vec<StockListing>>),
    Prediction(Arc<PredictionResponse>),
}

/// Query parameters for the symbol search
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct SearchQuery {
    /// Text matched against symbol and company name
    #[validate(length(max = 64))]
    pub q: Option<String>,
}

/// Query parameters for the dashboard
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct DashboardQuery {
    /// First day of the historical window (default: 2024-01-01)
    pub start_date: Option<NaiveDate>,
    /// Last day of the historical window (default: today)
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for predictions
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PredictionQuery {
    /// Forecast horizon in days (default: 5)
    #[validate(range(min = 1, max = 5))]
    pub future_days: Option<u32>,
    /// First day of the displayed window (default: 2024-01-01)
    pub start_date: Option<NaiveDate>,
    /// Last day of the displayed window (default: today)
    pub end_date: Option<NaiveDate>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Whether retrying the same request can succeed
    pub retryable: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Number of cached upstream payloads
    pub cached_entries: u64,
}

/// Stock dashboard: snapshot, history and portfolio context for one symbol
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub snapshot: StockSnapshot,
    /// Display strings derived from the snapshot
    pub summary: DashboardSummary,
    pub historical: Vec<HistoricalBar>,
    /// Portfolio fields exactly as the backend returned them
    pub portfolio: serde_json::Value,
}

/// Stock news in display order with formatted sentiment shares
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockNewsResponse {
    pub symbol: String,
    pub news: StockNews,
    /// Article dates as displayed, e.g. "Mar 5, 2024", in article order
    pub display_dates: Vec<String>,
    /// Positive share, e.g. "62.50%"
    pub positive: String,
    /// Negative share, e.g. "37.50%"
    pub negative: String,
}

/// Latest prediction view of a symbol
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredictionViewResponse {
    pub symbol: String,
    /// One of idle, fetching, ready, errored
    pub status: String,
    /// Generation of the request that produced this state
    pub generation: u64,
    pub window: Option<PredictionWindow>,
    pub error: Option<String>,
}

impl PredictionViewResponse {
    pub fn from_state(symbol: &str, state: ViewState) -> Self {
        let status = state.status().to_string();
        let generation = state.generation();
        let (window, error) = match state {
            ViewState::Ready { window, .. } => (Some(window), None),
            ViewState::Errored { message, .. } => (None, Some(message)),
            ViewState::Idle | ViewState::Fetching { .. } => (None, None),
        };
        Self {
            symbol: symbol.to_string(),
            status,
            generation,
            window,
            error,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::news::get_news_feed,
        crate::handlers::stocks::search_stocks,
        crate::handlers::stocks::get_dashboard,
        crate::handlers::stocks::get_stock_news,
        crate::handlers::predictions::get_predictions,
        crate::handlers::predictions::get_latest_prediction,
    ),
    components(
        schemas(
            ApiResponse<Vec<StockListing>>,
            ApiResponse<DashboardResponse>,
            ApiResponse<StockNewsResponse>,
            ApiResponse<PredictionWindow>,
            ApiResponse<PredictionViewResponse>,
            ErrorResponse,
            HealthResponse,
            SearchQuery,
            DashboardQuery,
            PredictionQuery,
            DashboardResponse,
            StockNewsResponse,
            PredictionViewResponse,
            PredictionWindow,
            TimeSeriesPoint,
            StockListing,
            StockSnapshot,
            SummaryDetail,
            PriceInfo,
            DashboardSummary,
            HistoricalBar,
            StockNews,
            NewsArticle,
            NewsCard,
            Sentiment,
            SentimentPercentage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "news", description = "Landing page news feed"),
        (name = "stocks", description = "Symbol search, dashboard and stock news"),
        (name = "predictions", description = "Price predictions merged with history"),
    ),
    info(
        title = "Stockscope API",
        description = "Stock dashboard service: market data, news and price predictions behind one API",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
