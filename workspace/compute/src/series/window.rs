use chrono::NaiveDate;
use common::TimeSeriesPoint;
use tracing::{debug, trace};

use super::SeriesMerger;
use crate::error::{Result, SeriesError};

pub(crate) fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(SeriesError::InvalidRange { start, end });
    }
    Ok(())
}

impl SeriesMerger {
    /// Clips a merged series to the inclusive `[start, end]` date window.
    ///
    /// Points dated strictly after "now" are always kept, so forecasts stay
    /// visible whatever window is selected.
    pub fn filter_range(&self, combined: &[TimeSeriesPoint], start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeSeriesPoint>> {
        validate_range(start, end)?;
        trace!("Filtering {} points to {}..={}", combined.len(), start, end);

        let now = self.now();
        let windowed: Vec<TimeSeriesPoint> = combined
            .iter()
            .filter(|point| {
                let day = point.date.date_naive();
                (start <= day && day <= end) || point.date > now
            })
            .cloned()
            .collect();

        debug!("Kept {} of {} points in window", windowed.len(), combined.len());
        Ok(windowed)
    }
}
