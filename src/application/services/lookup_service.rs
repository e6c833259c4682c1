//! Short code resolution.

use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::ShortUrlRecord;
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;
use crate::utils::code_rules::is_well_formed;

/// Read-only service resolving codes to stored records.
pub struct LookupService<R: RecordRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: RecordRepository + ?Sized> LookupService<R> {
    /// Creates a new lookup service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Finds the record stored under `code`.
    ///
    /// A miss is `Ok(None)`, not an error. Codes that no shorten request could
    /// have stored are answered without a store round trip.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] when the store fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        if !is_well_formed(code) {
            debug!("Malformed code {:?}, skipping lookup", code);
            return Ok(None);
        }

        self.repository.find_by_code(code).await
    }
}
