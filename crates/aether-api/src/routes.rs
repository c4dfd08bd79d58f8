//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{analyze_collection_theme, classify, current_theme, health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    ClientRateLimiter,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let rate_limiter = ClientRateLimiter::new(state.config.rate_limit_rps, state.config.rate_limit_burst);
    create_router_with_limiter(state, metrics_handle, rate_limiter)
}

/// Create the API router around an existing rate limiter.
pub fn create_router_with_limiter(
    state: AppState,
    metrics_handle: Option<PrometheusHandle>,
    rate_limiter: ClientRateLimiter,
) -> Router {
    // Routes that decode images are rate limited per client
    let analysis_routes = Router::new()
        .route("/analyze/collection-theme", post(analyze_collection_theme))
        .route("/classify", post(classify))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let theme_routes = Router::new().route("/theme/current", get(current_theme));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(analysis_routes)
        .merge(theme_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
