//! Handler for short URL redirect.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - **301 Moved Permanently** with `Location` set to the long URL
/// - **301** to the configured not-found URL when the code is unknown and
///   `NOT_FOUND_REDIRECT_URL` is set
/// - **404** with `{ "error": "Not found" }` otherwise
///
/// # Errors
///
/// Store failures are rendered as the usual `404` error body.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.lookup_service.find_by_code(&code).await? {
        Some(record) => {
            info!(
                "[REDIRECTING] {}/{} => {}",
                state.base_url, code, record.long_url
            );
            Ok(moved_permanently(&record.long_url))
        }
        None => {
            info!("[NOT FOUND] {}/{}", state.base_url, code);
            Ok(not_found(&state))
        }
    }
}

/// Answers any request no route or method matches, the same way as an
/// unknown code.
pub async fn not_found_handler(State(state): State<AppState>, uri: Uri) -> Response {
    info!("[NOT FOUND] {}{}", state.base_url, uri.path());
    not_found(&state)
}

fn not_found(state: &AppState) -> Response {
    match state.not_found_redirect.as_deref() {
        Some(url) => moved_permanently(url),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response(),
    }
}

// `Redirect::permanent` answers 308; clients of this service expect 301.
fn moved_permanently(location: &str) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}
