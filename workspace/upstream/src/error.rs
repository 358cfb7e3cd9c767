use thiserror::Error;
use tracing::warn;

/// Failures of a call to one of the upstream services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response at all: refused connection, DNS failure, reset
    #[error("Network error: {0}")]
    Network(String),

    /// The fixed per-request deadline elapsed
    #[error("Request timed out")]
    Timeout,

    /// Upstream answered with a non-2xx status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// A 2xx body that does not match the expected record
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Client could not be built for the configured endpoint
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => "No response from server. Please check your connection.".to_string(),
            FetchError::Timeout => "Request timed out. Please try again.".to_string(),
            FetchError::Server { message, .. } => message.clone(),
            FetchError::DataFormat(_) => "Received malformed data from server.".to_string(),
            FetchError::Config(_) => "Service is misconfigured.".to_string(),
        }
    }

    /// Whether a manual retry can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Network(_) | FetchError::Timeout | FetchError::Server { .. }
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let fetch_error = if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_decode() {
            FetchError::DataFormat(error.to_string())
        } else if error.is_builder() {
            FetchError::Config(error.to_string())
        } else {
            FetchError::Network(error.to_string())
        };
        warn!(?fetch_error, "Upstream request failed");
        fetch_error
    }
}

/// Type alias for Result with FetchError
pub type Result<T> = std::result::Result<T, FetchError>;
