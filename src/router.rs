use crate::handlers::{
    health::health_check,
    news::get_news_feed,
    predictions::{get_latest_prediction, get_predictions},
    stocks::{get_dashboard, get_stock_news, search_stocks},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{Router, routing::get};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Landing page feed
        .route("/api/news", get(get_news_feed))
        // Stock routes
        .route("/api/v1/stocks/search", get(search_stocks))
        .route("/api/v1/stocks/:symbol/dashboard", get(get_dashboard))
        .route("/api/v1/stocks/:symbol/news", get(get_stock_news))
        // Prediction routes
        .route("/api/v1/stocks/:symbol/predictions", get(get_predictions))
        .route("/api/v1/stocks/:symbol/predictions/latest", get(get_latest_prediction))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    with_metrics(router).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(CorsLayer::permissive()),
    )
}

/// Prometheus request metrics, served at `/metrics`.
#[cfg(not(test))]
fn with_metrics(router: Router) -> Router {
    use axum_prometheus::PrometheusMetricLayer;

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    router
        .route("/metrics", get(move || async move { metric_handle.render() }))
        .layer(prometheus_layer)
}

// The metrics recorder is process-global, so test routers go without it.
#[cfg(test)]
fn with_metrics(router: Router) -> Router {
    router
}
