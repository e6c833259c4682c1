//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`        - Landing page
//! - `GET  /health`  - Store health checks
//! - `POST /create`  - Create short URLs
//! - `GET  /{code}`  - Short link redirect
//!
//! # Middleware
//!
//! - **CORS** - Origin whitelist from `CORS_WHITELIST`
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors` - layer built by [`crate::api::middleware::cors::layer`]
pub fn app_router(state: AppState, cors: CorsLayer) -> NormalizePath<Router> {
    let router = api::routes::public_routes()
        .with_state(state)
        .layer(cors)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
