//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Both stores respond
/// - **503 Service Unavailable**: One or more stores degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "record_store": { "status": "ok", "message": "Record store reachable" },
///     "counter_store": { "status": "ok", "message": "Counter store reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (records_ok, counter_ok) =
        tokio::join!(state.records.health_check(), state.counter.health_check());

    let record_store = CheckStatus::from_probe(
        records_ok,
        "Record store reachable",
        "Record store unreachable",
    );
    let counter_store = CheckStatus::from_probe(
        counter_ok,
        "Counter store reachable",
        "Counter store unreachable",
    );

    let all_healthy = record_store.is_ok() && counter_store.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            record_store,
            counter_store,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        tracing::warn!("Health check degraded");
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
