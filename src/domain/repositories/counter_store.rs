//! Trait for the shared, persistent counter.

use crate::error::AppError;
use async_trait::async_trait;

/// Atomic counter shared by every process of the service.
///
/// `increment` must be atomic in the backing store: it is the only operation
/// that serializes concurrent shorten requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increments the counter and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CounterUnavailable`] if the store is unreachable.
    async fn increment(&self) -> Result<i64, AppError>;

    /// Reads the counter without changing it. A missing counter reads as `0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CounterUnavailable`] if the store is unreachable.
    async fn current(&self) -> Result<i64, AppError>;

    /// Overwrites the counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CounterUnavailable`] if the store is unreachable.
    async fn set(&self, value: i64) -> Result<(), AppError>;

    /// Checks that the store answers.
    async fn health_check(&self) -> bool;
}
