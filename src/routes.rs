//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /{code}`         - Short link redirect (public)
//! - `GET    /health`         - Health check: database, analytics (public)
//! - `/links*`                - Link and key management (API key in body)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, separate quotas for redirects
//!   and management (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, MANAGEMENT_QUOTA, REDIRECT_QUOTA};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let management = rate_limit::apply(
        api::routes::management_routes(),
        MANAGEMENT_QUOTA,
        behind_proxy,
    );

    let redirects = rate_limit::apply(
        api::routes::redirect_routes(),
        REDIRECT_QUOTA,
        behind_proxy,
    );

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(management)
        .merge(redirects)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
