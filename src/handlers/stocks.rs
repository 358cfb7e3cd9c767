use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{
    DashboardSummary, StockListing,
    format::{format_news_date, format_percent},
};
use compute::error::SeriesError;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace};
use upstream::fetch_dashboard;

use crate::helpers::errors::{ApiError, error_response, fetch_error_response, normalize_symbol, series_error_response};
use crate::helpers::window::resolve_window;
use crate::schemas::{
    ApiResponse, AppState, CachedData, DashboardQuery, DashboardResponse, SearchQuery, StockNewsResponse,
};

/// Most suggestions returned by one search.
pub const MAX_SEARCH_RESULTS: usize = 5;

const LISTINGS_CACHE_KEY: &str = "listings";

/// Backend symbol list, fetched once per cache lifetime.
async fn cached_listings(state: &AppState) -> Result<Arc<Vec<StockListing>>, ApiError> {
    let stocks = state.stocks.clone();
    let cached = state
        .cache
        .try_get_with(LISTINGS_CACHE_KEY.to_string(), async move {
            stocks.list_stocks().await.map(|listings| CachedData::Listings(Arc::new(listings)))
        })
        .await
        .map_err(|e| {
            error!("Failed to load stock listings: {}", e);
            fetch_error_response(&e)
        })?;

    match cached {
        CachedData::Listings(listings) => Ok(listings),
        other => {
            error!("Unexpected cache entry under {}: {:?}", LISTINGS_CACHE_KEY, other);
            state.cache.invalidate(LISTINGS_CACHE_KEY).await;
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CACHE_ERROR",
                "Stock listings are temporarily unavailable",
                true,
            ))
        }
    }
}

/// Search stock symbols
///
/// Case-insensitive match on symbol or company name, at most five results.
/// A blank query returns no suggestions without contacting the backend.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/search",
    tag = "stocks",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching symbols", body = ApiResponse<Vec<StockListing>>),
        (status = 502, description = "Stock backend failed", body = ErrorResponse),
        (status = 504, description = "Stock backend timed out", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn search_stocks(
    Valid(Query(query)): Valid<Query<SearchQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StockListing>>>, ApiError> {
    let needle = query.q.as_deref().map(str::trim).unwrap_or_default();
    if needle.is_empty() {
        trace!("Blank search query, returning no suggestions");
        return Ok(Json(ApiResponse {
            data: vec![],
            message: "No search query given".to_string(),
            success: true,
        }));
    }

    let listings = cached_listings(&state).await?;
    let matches: Vec<StockListing> = listings
        .iter()
        .filter(|listing| listing.matches(needle))
        .take(MAX_SEARCH_RESULTS)
        .cloned()
        .collect();

    debug!("Search '{}' matched {} symbols", needle, matches.len());
    Ok(Json(ApiResponse {
        data: matches,
        message: "Stock search completed successfully".to_string(),
        success: true,
    }))
}

/// Stock dashboard
///
/// Snapshot, historical bars and portfolio context are fetched concurrently.
/// The first failure aborts the rest and is reported alone.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/{symbol}/dashboard",
    tag = "stocks",
    params(
        ("symbol" = String, Path, description = "Ticker symbol"),
        DashboardQuery
    ),
    responses(
        (status = 200, description = "Dashboard retrieved successfully", body = ApiResponse<DashboardResponse>),
        (status = 400, description = "Invalid symbol or date window", body = ErrorResponse),
        (status = 502, description = "Stock backend failed", body = ErrorResponse),
        (status = 504, description = "Stock backend timed out", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_dashboard(
    Path(symbol): Path<String>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    let (start_date, end_date) = resolve_window(query.start_date, query.end_date);
    if start_date > end_date {
        return Err(series_error_response(&SeriesError::InvalidRange {
            start: start_date,
            end: end_date,
        }));
    }

    let dashboard = fetch_dashboard(state.stocks.as_ref(), &symbol, start_date, end_date)
        .await
        .map_err(|e| {
            error!("Dashboard fetch for {} failed: {}", symbol, e);
            fetch_error_response(&e)
        })?;

    info!("Dashboard for {} ready with {} bars", symbol, dashboard.historical.len());
    let summary = DashboardSummary::from_snapshot(&dashboard.snapshot);
    Ok(Json(ApiResponse {
        data: DashboardResponse {
            symbol,
            start_date,
            end_date,
            snapshot: dashboard.snapshot,
            summary,
            historical: dashboard.historical,
            portfolio: dashboard.portfolio,
        },
        message: "Dashboard retrieved successfully".to_string(),
        success: true,
    }))
}

/// Stock news
///
/// Articles newest first with publisher boilerplate stripped from snippets.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/{symbol}/news",
    tag = "stocks",
    params(
        ("symbol" = String, Path, description = "Ticker symbol")
    ),
    responses(
        (status = 200, description = "News retrieved successfully", body = ApiResponse<StockNewsResponse>),
        (status = 400, description = "Invalid symbol", body = ErrorResponse),
        (status = 502, description = "Stock backend failed", body = ErrorResponse),
        (status = 504, description = "Stock backend timed out", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_stock_news(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StockNewsResponse>>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    let news = state
        .stocks
        .stock_news(&symbol)
        .await
        .map_err(|e| {
            error!("News fetch for {} failed: {}", symbol, e);
            fetch_error_response(&e)
        })?
        .into_display_order();

    debug!("Fetched {} articles for {}", news.articles.len(), symbol);
    let display_dates = news.articles.iter().map(|article| format_news_date(article.date)).collect();
    let positive = format_percent(news.sentiment_percentage.positive);
    let negative = format_percent(news.sentiment_percentage.negative);
    Ok(Json(ApiResponse {
        data: StockNewsResponse {
            symbol,
            news,
            display_dates,
            positive,
            negative,
        },
        message: "Stock news retrieved successfully".to_string(),
        success: true,
    }))
}
