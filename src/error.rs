//! Application error type and its JSON rendering.
//!
//! Every error leaves the HTTP layer as `{ "error": true, "message": "..." }`
//! with status `404 Not Found` for every variant; existing clients only look
//! at the body. Store and counter failures are logged with their details;
//! clients only see a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request: bad JSON, wrong type, URL or code shape.
    #[error("{0}")]
    InvalidInput(String),

    /// Missing or mismatched API key.
    #[error("{0}")]
    Unauthorized(String),

    /// The counter store could not issue a value.
    #[error("counter unavailable: {0}")]
    CounterUnavailable(String),

    /// The record store failed to read or write.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A uniqueness constraint rejected an insert.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn counter_unavailable(message: impl Into<String>) -> Self {
        Self::CounterUnavailable(message.into())
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Message safe to show to API clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(message) | Self::Unauthorized(message) => message.clone(),
            Self::Conflict(_) => "Short code already exists".to_string(),
            Self::CounterUnavailable(_) | Self::StoreUnavailable(_) => {
                "Service temporarily unavailable".to_string()
            }
            Self::Internal(_) => "Internal error".to_string(),
        }
    }

    /// Converts the error into the response body shape.
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            error: true,
            message: self.public_message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::CounterUnavailable(_) | Self::StoreUnavailable(_) | Self::Internal(_) => {
                tracing::error!("{}", self);
            }
            Self::Conflict(_) => tracing::warn!("{}", self),
            Self::InvalidInput(_) | Self::Unauthorized(_) => tracing::debug!("{}", self),
        }

        (StatusCode::NOT_FOUND, Json(self.to_error_body())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return Self::Conflict(format!(
                "unique constraint {} violated",
                db.constraint().unwrap_or("unknown")
            ));
        }

        Self::StoreUnavailable(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let message = e
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| e.to_string());

        Self::InvalidInput(message)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        Self::CounterUnavailable(e.to_string())
    }
}
