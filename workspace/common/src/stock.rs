use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::format::{format_currency, format_fixed, format_large_number, format_percent};

/// Summary block of the stock-data snapshot (mirrors the backend's `summaryDetail`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    pub day_high: Decimal,
    pub day_low: Decimal,
    pub fifty_two_week_high: Decimal,
    pub fifty_two_week_low: Decimal,
    pub market_cap: Decimal,
    #[serde(rename = "trailingPE", default)]
    pub trailing_pe: Option<Decimal>,
    pub volume: Decimal,
    pub average_volume: Decimal,
}

/// Price block of the stock-data snapshot (mirrors the backend's `price`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceInfo {
    pub regular_market_price: Decimal,
    pub regular_market_change: Decimal,
    pub regular_market_change_percent: Decimal,
    pub short_name: String,
    pub long_name: String,
}

/// Snapshot pricing and summary fields for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub summary_detail: SummaryDetail,
    pub price: PriceInfo,
}

/// One OHLC+volume bar from the historical-data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBar {
    pub date: DateTime<Utc>,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub adj_close: Decimal,
}

/// Entry of the backend's symbol listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockListing {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

impl StockListing {
    /// Case-insensitive substring match on symbol or name.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.symbol.to_lowercase().contains(&query) || self.name.to_lowercase().contains(&query)
    }
}

/// Preformatted display strings for the dashboard header and stat cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub short_name: String,
    pub long_name: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    /// `true` when the change is zero or positive
    pub trending_up: bool,
    pub day_range: String,
    pub fifty_two_week_range: String,
    pub market_cap: String,
    pub pe_ratio: Option<String>,
    pub volume: String,
    pub average_volume: String,
}

impl DashboardSummary {
    pub fn from_snapshot(snapshot: &StockSnapshot) -> Self {
        let summary = &snapshot.summary_detail;
        let price = &snapshot.price;

        Self {
            short_name: price.short_name.clone(),
            long_name: price.long_name.clone(),
            price: format_currency(price.regular_market_price),
            change: format_fixed(price.regular_market_change),
            change_percent: format!("({})", format_percent(price.regular_market_change_percent)),
            trending_up: price.regular_market_change >= Decimal::ZERO,
            day_range: format!("{} - {}", format_currency(summary.day_low), format_currency(summary.day_high)),
            fifty_two_week_range: format!(
                "{} - {}",
                format_currency(summary.fifty_two_week_low),
                format_currency(summary.fifty_two_week_high)
            ),
            market_cap: format!("₹{}", format_large_number(summary.market_cap)),
            pe_ratio: summary.trailing_pe.map(format_fixed),
            volume: format_large_number(summary.volume),
            average_volume: format_large_number(summary.average_volume),
        }
    }
}
