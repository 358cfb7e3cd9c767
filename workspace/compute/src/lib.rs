pub mod error;
pub mod news;
pub mod series;
pub mod view;

use chrono::{DateTime, Utc};
use series::SeriesMerger;

/// Returns the merger used for every render cycle.
///
/// This function uses the provided instant as "now" or the current time if none is provided.
pub fn default_merger(now: Option<DateTime<Utc>>) -> SeriesMerger {
    match now {
        Some(now) => SeriesMerger::new_with_now(now),
        None => SeriesMerger::new(),
    }
}
