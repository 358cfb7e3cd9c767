//! Common transport-layer types shared between the service, the CLI and the
//! upstream clients. These structs mirror the stock backend's payloads so
//! every crate deserializes and renders the same shapes.

pub mod format;
mod news;
mod series;
mod stock;

pub use news::{NewsArticle, NewsCard, Sentiment, SentimentPercentage, StockNews};
pub use series::{PredictionWindow, TimeSeriesPoint};
pub use stock::{DashboardSummary, HistoricalBar, PriceInfo, StockListing, StockSnapshot, SummaryDetail};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

/// The `{ "data": ... }` envelope the stock backend wraps every payload in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataEnvelope<T> {
    pub data: T,
}
