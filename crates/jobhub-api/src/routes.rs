//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::auth::authenticate;
use crate::handlers::{browse, company_me, health, login, me, ready, register, seeker_me};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
///
/// Authentication runs on every route, including the fallback; the route
/// table in `AppState` decides which paths accept anonymous callers.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Login and registration are rate-limited per client IP
    let auth_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));
    let auth_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .layer(middleware::from_fn_with_state(auth_limiter, rate_limit_middleware));

    let account_routes = Router::new()
        .route("/me", get(me))
        .route("/companies/me", get(company_me))
        .route("/seekers/me", get(seeker_me));

    let browse_routes = Router::new()
        .route("/job-posts", get(browse))
        .route("/companies", get(browse))
        .route("/statistics", get(browse))
        .route("/recommendations", get(browse));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(account_routes)
        .merge(browse_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
