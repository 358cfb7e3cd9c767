use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod merge;
pub mod window;

pub use merge::SeriesMerger;

/// A timestamp as it arrives on the wire: ISO-8601 text or epoch milliseconds.
///
/// Any other JSON value is kept as `Other` so it fails at its own index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Epoch(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawDate {
    /// Parses the raw value into a UTC timestamp.
    ///
    /// Text without an offset is read as UTC; a bare date is midnight UTC.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            RawDate::Epoch(millis) => Utc.timestamp_millis_opt(*millis).single(),
            RawDate::Text(text) => parse_text(text.trim()),
            RawDate::Other(_) => None,
        }
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl From<&str> for RawDate {
    fn from(text: &str) -> Self {
        RawDate::Text(text.to_string())
    }
}

/// Historical point as received: every field may be absent until validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoricalPoint {
    pub date: Option<RawDate>,
    pub actual_price: Option<Decimal>,
    pub predicted_price: Option<Decimal>,
}

impl HistoricalPoint {
    pub fn new(date: impl Into<RawDate>, actual_price: Decimal, predicted_price: Decimal) -> Self {
        Self {
            date: Some(date.into()),
            actual_price: Some(actual_price),
            predicted_price: Some(predicted_price),
        }
    }
}

/// Forecast point as received; it never carries an actual price.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuturePoint {
    pub date: Option<RawDate>,
    pub predicted_price: Option<Decimal>,
}

impl FuturePoint {
    pub fn new(date: impl Into<RawDate>, predicted_price: Decimal) -> Self {
        Self {
            date: Some(date.into()),
            predicted_price: Some(predicted_price),
        }
    }
}
