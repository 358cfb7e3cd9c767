use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Which input series a malformed point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Historical,
    Future,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Historical => write!(f, "historical"),
            SeriesKind::Future => write!(f, "future"),
        }
    }
}

/// Error types for the compute module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// A point is missing a field or carries a value that cannot be used
    #[error("Data format error in {series} series at index {index}: {reason}")]
    DataFormat {
        series: SeriesKind,
        index: usize,
        reason: String,
    },

    /// The requested date window ends before it starts
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl SeriesError {
    pub(crate) fn data_format(series: SeriesKind, index: usize, reason: impl Into<String>) -> Self {
        SeriesError::DataFormat {
            series,
            index,
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with SeriesError
pub type Result<T> = std::result::Result<T, SeriesError>;
