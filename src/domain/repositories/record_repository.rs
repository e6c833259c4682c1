//! Repository trait for short URL records.

use crate::domain::entities::{NewShortUrl, ShortUrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Document store holding [`ShortUrlRecord`]s.
///
/// There is no update or delete: records are immutable once inserted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecordRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryRecordRepository`] - in-process, for
///   development and tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the id or the code is already taken.
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn insert(&self, new_record: NewShortUrl) -> Result<ShortUrlRecord, AppError>;

    /// Finds the record stored under `code`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError>;

    /// Finds a record for `long_url`. If a race stored several, the oldest wins.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrlRecord>, AppError>;

    /// Counts stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks that the store answers.
    async fn health_check(&self) -> bool;

    /// Releases the underlying connections. Called once on shutdown.
    async fn disconnect(&self);
}
