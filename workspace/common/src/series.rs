use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single point on the actual/predicted price chart.
///
/// `actual_price` is only present for historical points where ground truth
/// exists; forecast points carry the predicted price alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeSeriesPoint {
    /// Timestamp of the point (UTC)
    pub date: DateTime<Utc>,
    /// Observed closing price, if known
    pub actual_price: Option<Decimal>,
    /// Model-fit or forecast price
    pub predicted_price: Decimal,
}

impl TimeSeriesPoint {
    pub fn historical(date: DateTime<Utc>, actual_price: Option<Decimal>, predicted_price: Decimal) -> Self {
        Self { date, actual_price, predicted_price }
    }

    pub fn forecast(date: DateTime<Utc>, predicted_price: Decimal) -> Self {
        Self { date, actual_price: None, predicted_price }
    }

    pub fn is_forecast(&self) -> bool {
        self.actual_price.is_none()
    }
}

/// A merged, windowed prediction series ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionWindow {
    /// Ticker symbol the series belongs to
    pub symbol: String,
    /// Forecast horizon in days
    pub future_days: u32,
    /// Inclusive start of the date window
    pub start_date: NaiveDate,
    /// Inclusive end of the date window
    pub end_date: NaiveDate,
    /// Points in ascending date order
    pub points: Vec<TimeSeriesPoint>,
}

impl PredictionWindow {
    /// Number of points that are forecasts without ground truth.
    pub fn forecast_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_forecast()).count()
    }
}
