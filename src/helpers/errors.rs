use axum::{http::StatusCode, response::Json};
use compute::error::SeriesError;
use upstream::FetchError;

use crate::schemas::ErrorResponse;

/// Rejection returned by every fallible handler.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, code: &str, error: impl Into<String>, retryable: bool) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            success: false,
            retryable,
        }),
    )
}

/// Maps an upstream failure onto the gateway status that describes it.
pub fn fetch_error_response(error: &FetchError) -> ApiError {
    let (status, code) = match error {
        FetchError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
        FetchError::Network(_) => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
        FetchError::Server { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        FetchError::DataFormat(_) => (StatusCode::BAD_GATEWAY, "DATA_FORMAT"),
        FetchError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
    };
    error_response(status, code, error.user_message(), error.is_retryable())
}

pub fn series_error_response(error: &SeriesError) -> ApiError {
    match error {
        SeriesError::InvalidRange { .. } => error_response(StatusCode::BAD_REQUEST, "INVALID_RANGE", error.to_string(), false),
        SeriesError::DataFormat { .. } => error_response(StatusCode::BAD_GATEWAY, "DATA_FORMAT", error.to_string(), false),
    }
}

pub fn invalid_symbol(symbol: &str) -> ApiError {
    error_response(
        StatusCode::BAD_REQUEST,
        "INVALID_SYMBOL",
        format!("'{}' is not a valid ticker symbol", symbol),
        false,
    )
}

/// Trims and uppercases a path symbol, rejecting anything that cannot be a ticker.
pub fn normalize_symbol(raw: &str) -> Result<String, ApiError> {
    let symbol = raw.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= 20
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '&' | '^' | '_'));
    if valid { Ok(symbol) } else { Err(invalid_symbol(raw)) }
}
