use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::PredictionWindow;
use compute::{default_merger, error::SeriesError};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use upstream::{PredictionRequest, PredictionResponse};

use crate::helpers::errors::{ApiError, error_response, fetch_error_response, normalize_symbol, series_error_response};
use crate::helpers::window::resolve_window;
use crate::schemas::{ApiResponse, AppState, CachedData, PredictionQuery, PredictionViewResponse};

/// Forecast horizon used when a request names none.
pub const DEFAULT_FUTURE_DAYS: u32 = 5;

fn prediction_cache_key(request: &PredictionRequest) -> String {
    format!(
        "prediction_{}_{}_{}_{}",
        request.symbol, request.future_days, request.start_date, request.end_date
    )
}

/// Prediction payload for `request`. Identical requests in flight at the
/// same time share one upstream call.
async fn cached_prediction(state: &AppState, request: &PredictionRequest) -> Result<Arc<PredictionResponse>, ApiError> {
    let key = prediction_cache_key(request);
    let source = state.predictions.clone();
    let upstream_request = request.clone();
    let cached = state
        .cache
        .try_get_with(key.clone(), async move {
            source
                .predict(&upstream_request)
                .await
                .map(|response| CachedData::Prediction(Arc::new(response)))
        })
        .await
        .map_err(|e| {
            error!("Prediction fetch for {} failed: {}", request.symbol, e);
            fetch_error_response(&e)
        })?;

    match cached {
        CachedData::Prediction(response) => Ok(response),
        other => {
            error!("Unexpected cache entry under {}: {:?}", key, other);
            state.cache.invalidate(&key).await;
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CACHE_ERROR",
                "Predictions are temporarily unavailable",
                true,
            ))
        }
    }
}

/// Price predictions
///
/// Merges the service's historical and forecast series into one
/// chronological sequence, clipped to the requested window. Forecast points
/// after now are always kept. The outcome also becomes the symbol's latest
/// view unless a newer request for the symbol has started meanwhile.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/{symbol}/predictions",
    tag = "predictions",
    params(
        ("symbol" = String, Path, description = "Ticker symbol"),
        PredictionQuery
    ),
    responses(
        (status = 200, description = "Predictions merged successfully", body = ApiResponse<PredictionWindow>),
        (status = 400, description = "Invalid symbol, horizon or date window", body = ErrorResponse),
        (status = 502, description = "Prediction service failed or sent malformed data", body = ErrorResponse),
        (status = 504, description = "Prediction service timed out", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_predictions(
    Path(symbol): Path<String>,
    Valid(Query(query)): Valid<Query<PredictionQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PredictionWindow>>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    let (start_date, end_date) = resolve_window(query.start_date, query.end_date);
    if start_date > end_date {
        return Err(series_error_response(&SeriesError::InvalidRange {
            start: start_date,
            end: end_date,
        }));
    }

    let request = PredictionRequest {
        symbol: symbol.clone(),
        future_days: query.future_days.unwrap_or(DEFAULT_FUTURE_DAYS),
        start_date,
        end_date,
    };
    let ticket = state.views.begin(&symbol);
    debug!("Prediction request {:?} issued as generation {}", request, ticket.generation());

    let outcome = match cached_prediction(&state, &request).await {
        Ok(response) => match response.to_window(&default_merger(None), &request) {
            Ok(window) => Ok(window),
            Err(e) => {
                warn!("Prediction payload for {} rejected: {}", symbol, e);
                state.cache.invalidate(&prediction_cache_key(&request)).await;
                Err(series_error_response(&e))
            }
        },
        Err(rejection) => Err(rejection),
    };

    let view_outcome = match &outcome {
        Ok(window) => Ok(window.clone()),
        Err((_, Json(body))) => Err(body.error.clone()),
    };
    if !state.views.apply(&ticket, view_outcome) {
        warn!(
            "Generation {} for {} finished after a newer request and left the view untouched",
            ticket.generation(),
            symbol
        );
    }

    let window = outcome?;
    info!(
        "Predictions for {} ready: {} points, {} forecast",
        symbol,
        window.points.len(),
        window.forecast_count()
    );
    Ok(Json(ApiResponse {
        data: window,
        message: "Predictions retrieved successfully".to_string(),
        success: true,
    }))
}

/// Latest prediction view
///
/// The outcome of the newest prediction request issued for the symbol.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/{symbol}/predictions/latest",
    tag = "predictions",
    params(
        ("symbol" = String, Path, description = "Ticker symbol")
    ),
    responses(
        (status = 200, description = "Latest view retrieved successfully", body = ApiResponse<PredictionViewResponse>),
        (status = 400, description = "Invalid symbol", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_latest_prediction(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PredictionViewResponse>>, ApiError> {
    let symbol = normalize_symbol(&symbol)?;
    let view = PredictionViewResponse::from_state(&symbol, state.views.state(&symbol));
    Ok(Json(ApiResponse {
        data: view,
        message: "Latest prediction view retrieved successfully".to_string(),
        success: true,
    }))
}
