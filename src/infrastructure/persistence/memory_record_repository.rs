//! In-process record repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{NewShortUrl, ShortUrlRecord};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

/// Record repository backed by concurrent hash maps.
///
/// Enforces the same uniqueness rules as the PostgreSQL schema (unique id,
/// unique code). Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryRecordRepository {
    by_code: DashMap<String, ShortUrlRecord>,
    codes_by_id: DashMap<i64, String>,
    /// First code stored for each long URL.
    codes_by_long_url: DashMap<String, String>,
}

impl MemoryRecordRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored record for `long_url`.
    pub fn records_for(&self, long_url: &str) -> Vec<ShortUrlRecord> {
        self.by_code
            .iter()
            .filter(|entry| entry.long_url == long_url)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl RecordRepository for MemoryRecordRepository {
    async fn insert(&self, new_record: NewShortUrl) -> Result<ShortUrlRecord, AppError> {
        // Locks are always taken id first, then code.
        let Entry::Vacant(id_slot) = self.codes_by_id.entry(new_record.id) else {
            return Err(AppError::conflict(format!("id {} already exists", new_record.id)));
        };
        let Entry::Vacant(code_slot) = self.by_code.entry(new_record.code.clone()) else {
            return Err(AppError::conflict(format!(
                "code {} already exists",
                new_record.code
            )));
        };

        let record = ShortUrlRecord::new(
            new_record.id,
            new_record.long_url,
            new_record.code,
            Utc::now(),
        );

        id_slot.insert(record.code.clone());
        code_slot.insert(record.clone());
        self.codes_by_long_url
            .entry(record.long_url.clone())
            .or_insert_with(|| record.code.clone());

        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        Ok(self.by_code.get(code).map(|entry| entry.value().clone()))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        let Some(code) = self
            .codes_by_long_url
            .get(long_url)
            .map(|entry| entry.value().clone())
        else {
            return Ok(None);
        };

        self.find_by_code(&code).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.by_code.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn disconnect(&self) {}
}
