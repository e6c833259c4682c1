//! Public route table.

use crate::api::handlers::{
    create_handler, health_handler, index_handler, not_found_handler, redirect_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All HTTP routes.
///
/// # Endpoints
///
/// - `GET  /`        - Landing page
/// - `GET  /health`  - Store health checks
/// - `POST /create`  - Create short URLs (single or batch)
/// - `GET  /{code}`  - Redirect to the long URL
///
/// `create` and `health` are reserved and never issued as codes. Unknown
/// paths and unsupported methods get the same answer as an unknown code.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/create", post(create_handler))
        .route("/{code}", get(redirect_handler))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
}
