use chrono::{DateTime, NaiveDate, Utc};
use common::TimeSeriesPoint;
use tracing::{debug, instrument, warn};

use super::{FuturePoint, HistoricalPoint, RawDate};
use crate::error::{Result, SeriesError, SeriesKind};

/// Combines a historical actual/predicted series with a forecast-only series.
///
/// "Now" is fixed at construction so that merging and windowing agree on
/// which points lie in the future.
#[derive(Debug, Clone, Copy)]
pub struct SeriesMerger {
    now: DateTime<Utc>,
}

impl Default for SeriesMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesMerger {
    /// Creates a merger using the current time as "now".
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    /// Creates a merger with a pinned "now".
    pub fn new_with_now(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Merges both series into one sequence sorted ascending by date.
    ///
    /// Nothing is dropped or deduplicated; on equal dates historical points
    /// come before forecasts and each keeps its input order.
    #[instrument(skip(self, historical, future), fields(historical = historical.len(), future = future.len()))]
    pub fn merge(&self, historical: &[HistoricalPoint], future: &[FuturePoint]) -> Result<Vec<TimeSeriesPoint>> {
        let mut combined = Vec::with_capacity(historical.len() + future.len());

        for (index, point) in historical.iter().enumerate() {
            let date = resolve_date(point.date.as_ref(), SeriesKind::Historical, index)?;
            let predicted_price = point
                .predicted_price
                .ok_or_else(|| SeriesError::data_format(SeriesKind::Historical, index, "missing predicted price"))?;
            if point.actual_price.is_some() && date > self.now {
                warn!(index, %date, "Historical point carries an actual price on a future date");
                return Err(SeriesError::data_format(
                    SeriesKind::Historical,
                    index,
                    "actual price on a future date",
                ));
            }
            combined.push(TimeSeriesPoint::historical(date, point.actual_price, predicted_price));
        }

        for (index, point) in future.iter().enumerate() {
            let date = resolve_date(point.date.as_ref(), SeriesKind::Future, index)?;
            let predicted_price = point
                .predicted_price
                .ok_or_else(|| SeriesError::data_format(SeriesKind::Future, index, "missing predicted price"))?;
            combined.push(TimeSeriesPoint::forecast(date, predicted_price));
        }

        // Stable, so ties keep the concatenation order.
        combined.sort_by_key(|point| point.date);

        debug!("Merged series has {} points", combined.len());
        Ok(combined)
    }

    /// Validates the window, merges, then clips to the window.
    pub fn merge_window(
        &self,
        historical: &[HistoricalPoint],
        future: &[FuturePoint],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeSeriesPoint>> {
        super::window::validate_range(start, end)?;
        let combined = self.merge(historical, future)?;
        self.filter_range(&combined, start, end)
    }
}

fn resolve_date(date: Option<&RawDate>, series: SeriesKind, index: usize) -> Result<DateTime<Utc>> {
    let raw = date.ok_or_else(|| SeriesError::data_format(series, index, "missing date"))?;
    raw.parse()
        .ok_or_else(|| SeriesError::data_format(series, index, format!("unparsable timestamp {:?}", raw)))
}
