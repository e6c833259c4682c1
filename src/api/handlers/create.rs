//! Handler for the create endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header},
};
use serde_json::Value;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::api::dto::create::{CreateRequest, CreateResponse};
use crate::error::AppError;
use crate::state::AppState;

pub const BAD_JSON_MESSAGE: &str = "Bad JSON";

/// Creates one short URL, or one per element of a `longUrl` array.
///
/// # Endpoint
///
/// `POST /create`
///
/// # Request Body
///
/// ```json
/// {
///   "apiKey": "secret",
///   "longUrl": "https://example.com/some/page",
///   "code": "my-link"
/// }
/// ```
///
/// `longUrl` may also be an array; `code` is then ignored.
///
/// # Response
///
/// ```json
/// { "longUrl": "https://example.com/some/page", "shortUrl": "http://localhost:3001/my-link" }
/// ```
///
/// # Errors
///
/// Every failure is answered with `404` and `{ "error": true, "message": "..." }`:
/// bad JSON, a missing or wrong `apiKey`, a missing `longUrl`, an invalid URL
/// or code, and store failures.
pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateResponse>, AppError> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    info!("[REQUEST FROM] {}", host);

    // A body that cannot be read as JSON at all carries no API key.
    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::JsonSyntaxError(_)) => {
            warn!("Bad JSON from {}", host);
            return Err(AppError::invalid_input(BAD_JSON_MESSAGE));
        }
        Err(rejection) => {
            debug!("Unreadable body from {}: {}", host, rejection.body_text());
            Value::Null
        }
    };

    state
        .auth_service
        .authenticate(body.get("apiKey").and_then(Value::as_str))?;

    let payload = CreateRequest::from_body(body)?;
    payload.validate()?;

    let (input, code) = payload.into_input()?;
    let outcome = state.shorten_service.shorten(input, code).await?;

    Ok(Json(outcome.into()))
}
