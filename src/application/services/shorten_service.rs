//! Short URL creation: validation, deduplication, code generation, persistence.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::application::services::CounterService;
use crate::domain::entities::{NewShortUrl, ShortUrlRecord};
use crate::domain::repositories::{CounterStore, RecordRepository};
use crate::error::AppError;
use crate::utils::base58;
use crate::utils::code_rules::{is_reserved_code, validate_custom_code};
use crate::utils::url_validator::{INVALID_URL_MESSAGE, NOT_A_STRING_MESSAGE, is_valid_url};

/// Attempts per record before giving up on store conflicts.
const MAX_ATTEMPTS: usize = 10;

/// What a client asked to shorten, decided at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortenInput {
    Single(String),
    Batch(Vec<BatchEntry>),
}

/// One element of a batch request.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Url(String),
    /// A JSON value that is not a string, kept to echo it back.
    NotAString(Value),
}

/// A long URL and the short URL that resolves to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub long_url: String,
    pub short_url: String,
}

/// Per-entry batch result.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchItem {
    Shortened(ShortLink),
    /// The entry that stopped the batch.
    Rejected { long_url: Value, message: String },
}

/// Result of [`ShortenService::shorten`], mirroring the input shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortenOutcome {
    Single(ShortLink),
    Batch(Vec<BatchItem>),
}

/// Service creating short URLs.
///
/// # Deduplication
///
/// - Without a caller code, an existing record for the same long URL is reused.
/// - With a caller code, an existing record for that code is reused whatever
///   long URL it points to.
///
/// Dedup is a read followed by an insert with no lock in between: two
/// concurrent requests for the same new URL may both insert and receive
/// different codes.
///
/// # Code Generation
///
/// A counter value from [`CounterService`] is the record id and its base-58
/// encoding is the code. Store conflicts are retried with a fresh value up to
/// 10 times.
pub struct ShortenService<R: RecordRepository + ?Sized, C: CounterStore + ?Sized> {
    repository: Arc<R>,
    counter: CounterService<C>,
    base_url: String,
}

impl<R: RecordRepository + ?Sized, C: CounterStore + ?Sized> ShortenService<R, C> {
    /// Creates a new shortening service. `base_url` prefixes every short URL.
    pub fn new(repository: Arc<R>, counter: CounterService<C>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            counter,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Shortens a single URL or a batch.
    ///
    /// `code` only applies to single requests and is ignored for batches.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] for an invalid single URL or code
    /// - [`AppError::CounterUnavailable`] / [`AppError::StoreUnavailable`] when
    ///   a backing store fails; a batch stops at that point and returns only
    ///   the error
    pub async fn shorten(
        &self,
        input: ShortenInput,
        code: Option<String>,
    ) -> Result<ShortenOutcome, AppError> {
        match input {
            ShortenInput::Single(long_url) => self
                .shorten_one(long_url, code)
                .await
                .map(ShortenOutcome::Single),
            ShortenInput::Batch(entries) => {
                if code.is_some() {
                    debug!("Ignoring code for batch request");
                }
                self.shorten_batch(entries).await.map(ShortenOutcome::Batch)
            }
        }
    }

    /// Shortens one URL, optionally under a caller-chosen code.
    ///
    /// An empty `code` is treated as absent.
    ///
    /// # Errors
    ///
    /// See [`Self::shorten`].
    pub async fn shorten_one(
        &self,
        long_url: String,
        code: Option<String>,
    ) -> Result<ShortLink, AppError> {
        if !is_valid_url(&long_url) {
            warn!("[ERROR: LONG_URL is an invalid URL] {}", long_url);
            return Err(AppError::invalid_input(INVALID_URL_MESSAGE));
        }

        match code.filter(|c| !c.is_empty()) {
            Some(code) => self.shorten_with_code(long_url, code).await,
            None => self.shorten_generated(long_url).await,
        }
    }

    /// Shortens every entry in order.
    ///
    /// The first entry that is not a string or not a valid URL is answered
    /// with a rejection item and ends the batch; entries after it are not
    /// processed. Entries whose URL already exists reuse the stored code.
    ///
    /// # Errors
    ///
    /// Store and counter failures abort the whole batch.
    pub async fn shorten_batch(&self, entries: Vec<BatchEntry>) -> Result<Vec<BatchItem>, AppError> {
        let mut items = Vec::with_capacity(entries.len());

        for entry in entries {
            let long_url = match entry {
                BatchEntry::NotAString(value) => {
                    error!("[ERROR: LONG_URL is not a string] {}", value);
                    metrics::counter!("dwarf_batch_aborted_total").increment(1);
                    items.push(BatchItem::Rejected {
                        long_url: value,
                        message: NOT_A_STRING_MESSAGE.to_string(),
                    });
                    break;
                }
                BatchEntry::Url(url) if !is_valid_url(&url) => {
                    error!("[ERROR: LONG_URL is an invalid URL] {}", url);
                    metrics::counter!("dwarf_batch_aborted_total").increment(1);
                    items.push(BatchItem::Rejected {
                        long_url: Value::String(url),
                        message: INVALID_URL_MESSAGE.to_string(),
                    });
                    break;
                }
                BatchEntry::Url(url) => url,
            };

            items.push(BatchItem::Shortened(self.shorten_generated(long_url).await?));
        }

        Ok(items)
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Reuses the record for `code` if there is one, otherwise stores `long_url` under it.
    async fn shorten_with_code(&self, long_url: String, code: String) -> Result<ShortLink, AppError> {
        validate_custom_code(&code)?;

        for _ in 0..MAX_ATTEMPTS {
            if let Some(existing) = self.repository.find_by_code(&code).await? {
                info!(
                    "[ABORTING: CODE already exists] {} => {}",
                    long_url,
                    self.short_url(&existing.code)
                );
                metrics::counter!("dwarf_links_reused_total").increment(1);
                return Ok(self.link_for(existing));
            }

            let id = self.counter.next().await?;
            let new_record = NewShortUrl {
                id,
                long_url: long_url.clone(),
                code: code.clone(),
            };

            // A conflict means the id or the code was taken since the lookup;
            // the next iteration re-checks the code before drawing again.
            match self.repository.insert(new_record).await {
                Ok(record) => return Ok(self.created(record)),
                Err(AppError::Conflict(reason)) => debug!("Insert conflict for {}: {}", code, reason),
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(format!(
            "could not store code {} after {} attempts",
            code, MAX_ATTEMPTS
        )))
    }

    /// Reuses the record for `long_url` if there is one, otherwise generates a code.
    async fn shorten_generated(&self, long_url: String) -> Result<ShortLink, AppError> {
        if let Some(existing) = self.repository.find_by_long_url(&long_url).await? {
            info!(
                "[ABORTING: LONG_URL already exists] {} => {}",
                long_url,
                self.short_url(&existing.code)
            );
            metrics::counter!("dwarf_links_reused_total").increment(1);
            return Ok(self.link_for(existing));
        }

        for _ in 0..MAX_ATTEMPTS {
            let id = self.counter.next().await?;
            let value = u64::try_from(id)
                .map_err(|_| AppError::internal(format!("negative counter value {}", id)))?;
            let code = base58::encode(value);

            if is_reserved_code(&code) {
                debug!("Skipping reserved code {}", code);
                continue;
            }

            let new_record = NewShortUrl {
                id,
                long_url: long_url.clone(),
                code,
            };

            match self.repository.insert(new_record).await {
                Ok(record) => return Ok(self.created(record)),
                Err(AppError::Conflict(reason)) => debug!("Insert conflict for id {}: {}", id, reason),
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(format!(
            "could not generate a unique code after {} attempts",
            MAX_ATTEMPTS
        )))
    }

    fn created(&self, record: ShortUrlRecord) -> ShortLink {
        info!("[CREATED] {} => {}", record.long_url, self.short_url(&record.code));
        metrics::counter!("dwarf_links_created_total").increment(1);
        self.link_for(record)
    }

    fn link_for(&self, record: ShortUrlRecord) -> ShortLink {
        ShortLink {
            short_url: self.short_url(&record.code),
            long_url: record.long_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockCounterStore, MockRecordRepository};
    use chrono::Utc;
    use serde_json::json;

    const BASE_URL: &str = "https://dwarf.test";

    fn record(id: i64, url: &str, code: &str) -> ShortUrlRecord {
        ShortUrlRecord::new(id, url.to_string(), code.to_string(), Utc::now())
    }

    fn stored(new_record: NewShortUrl) -> Result<ShortUrlRecord, AppError> {
        Ok(ShortUrlRecord::new(
            new_record.id,
            new_record.long_url,
            new_record.code,
            Utc::now(),
        ))
    }

    fn counter_returning(value: i64) -> MockCounterStore {
        let mut counter = MockCounterStore::new();
        counter.expect_increment().returning(move || Ok(value));
        counter
    }

    fn service(
        repo: MockRecordRepository,
        counter: MockCounterStore,
    ) -> ShortenService<MockRecordRepository, MockCounterStore> {
        ShortenService::new(
            Arc::new(repo),
            CounterService::new(Arc::new(counter)),
            format!("{}/", BASE_URL),
        )
    }

    #[tokio::test]
    async fn test_shorten_new_url_generates_code() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_record| new_record.code == base58::encode(new_record.id as u64))
            .times(1)
            .returning(stored);

        let service = service(repo, counter_returning(1));

        let link = service
            .shorten_one("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.long_url, "https://example.com");
        assert!(link.short_url.starts_with("https://dwarf.test/"));
        let code = link.short_url.trim_start_matches("https://dwarf.test/");
        let value = base58::decode(code).unwrap() as i64;
        assert!((1 + 9_999..1 + 999_999).contains(&value));
    }

    #[tokio::test]
    async fn test_shorten_existing_url_is_deduplicated() {
        let mut repo = MockRecordRepository::new();
        let existing = record(12_345, "https://example.com", "4ER");
        repo.expect_find_by_long_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().times(0);

        let mut counter = MockCounterStore::new();
        counter.expect_increment().times(0);

        let service = service(repo, counter);

        let link = service
            .shorten_one("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.short_url, "https://dwarf.test/4ER");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url_touches_no_store() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url().times(0);
        repo.expect_find_by_code().times(0);
        repo.expect_insert().times(0);

        let mut counter = MockCounterStore::new();
        counter.expect_increment().times(0);

        let service = service(repo, counter);

        let result = service.shorten_one("ftp://example.com".to_string(), None).await;

        match result {
            Err(AppError::InvalidInput(message)) => assert_eq!(message, INVALID_URL_MESSAGE),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shorten_with_new_code_uses_that_code() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_long_url().times(0);
        repo.expect_insert()
            .withf(|new_record| new_record.code == "promo")
            .times(1)
            .returning(stored);

        let service = service(repo, counter_returning(7));

        let link = service
            .shorten_one("https://example.com/sale".to_string(), Some("promo".to_string()))
            .await
            .unwrap();

        assert_eq!(link.short_url, "https://dwarf.test/promo");
        assert_eq!(link.long_url, "https://example.com/sale");
    }

    #[tokio::test]
    async fn test_shorten_with_existing_code_reuses_it_for_any_url() {
        let mut repo = MockRecordRepository::new();
        let existing = record(20_000, "https://first.com", "promo");
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().times(0);

        let mut counter = MockCounterStore::new();
        counter.expect_increment().times(0);

        let service = service(repo, counter);

        let link = service
            .shorten_one("https://second.com".to_string(), Some("promo".to_string()))
            .await
            .unwrap();

        assert_eq!(link.short_url, "https://dwarf.test/promo");
        assert_eq!(link.long_url, "https://first.com");
    }

    #[tokio::test]
    async fn test_empty_code_is_treated_as_absent() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_code().times(0);
        repo.expect_find_by_long_url().times(1).returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(stored);

        let service = service(repo, counter_returning(1));

        let result = service
            .shorten_one("https://example.com".to_string(), Some(String::new()))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reserved_code_is_rejected() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_code().times(0);

        let service = service(repo, MockCounterStore::new());

        let result = service
            .shorten_one("https://example.com".to_string(), Some("health".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_counter_failure_persists_nothing() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url().times(1).returning(|_| Ok(None));
        repo.expect_insert().times(0);

        let mut counter = MockCounterStore::new();
        counter
            .expect_increment()
            .times(1)
            .returning(|| Err(AppError::counter_unavailable("connection refused")));

        let service = service(repo, counter);

        let result = service.shorten_one("https://example.com".to_string(), None).await;

        assert!(matches!(result, Err(AppError::CounterUnavailable(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable("pool timed out")));

        let service = service(repo, MockCounterStore::new());

        let result = service.shorten_one("https://example.com".to_string(), None).await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_insert_conflict_retries_with_new_value() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url().times(1).returning(|_| Ok(None));

        let mut seq = mockall::Sequence::new();
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("short_urls_pkey")));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(stored);

        let mut counter = MockCounterStore::new();
        counter.expect_increment().times(2).returning(|| Ok(1));

        let service = service(repo, counter);

        let result = service.shorten_one("https://example.com".to_string(), None).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_persistent_conflicts_give_up() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url().times(1).returning(|_| Ok(None));
        repo.expect_insert()
            .times(MAX_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("short_urls_pkey")));

        let service = service(repo, counter_returning(1));

        let result = service.shorten_one("https://example.com".to_string(), None).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_code_conflict_resolves_to_concurrent_winner() {
        let mut repo = MockRecordRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("short_urls_code_key")));
        let winner = record(30_000, "https://winner.com", "promo");
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));

        let service = service(repo, counter_returning(1));

        let link = service
            .shorten_one("https://loser.com".to_string(), Some("promo".to_string()))
            .await
            .unwrap();

        assert_eq!(link.long_url, "https://winner.com");
        assert_eq!(link.short_url, "https://dwarf.test/promo");
    }

    #[tokio::test]
    async fn test_two_dedup_misses_store_two_codes() {
        // Replays the interleaving of two concurrent requests for the same URL
        // where both reads run before either insert: the calls here are
        // sequential, the mock just misses twice. The in-memory store never
        // yields between read and insert, so this cannot be reproduced there.
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url().times(2).returning(|_| Ok(None));
        repo.expect_insert().times(2).returning(stored);

        let mut counter = MockCounterStore::new();
        let mut raw = 0;
        counter.expect_increment().times(2).returning(move || {
            raw += 1_000_000;
            Ok(raw)
        });

        let service = service(repo, counter);

        let first = service
            .shorten_one("https://race.com".to_string(), None)
            .await
            .unwrap();
        let second = service
            .shorten_one("https://race.com".to_string(), None)
            .await
            .unwrap();

        assert_ne!(first.short_url, second.short_url);
    }

    #[tokio::test]
    async fn test_batch_aborts_on_non_string_entry() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url()
            .withf(|url| url == "https://a.com")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(stored);

        let service = service(repo, counter_returning(1));

        let items = service
            .shorten_batch(vec![
                BatchEntry::Url("https://a.com".to_string()),
                BatchEntry::NotAString(json!(123)),
                BatchEntry::Url("https://b.com".to_string()),
            ])
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], BatchItem::Shortened(link) if link.long_url == "https://a.com"));
        assert_eq!(
            items[1],
            BatchItem::Rejected {
                long_url: json!(123),
                message: NOT_A_STRING_MESSAGE.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_batch_aborts_on_invalid_url() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_long_url().times(0);
        repo.expect_insert().times(0);

        let service = service(repo, MockCounterStore::new());

        let items = service
            .shorten_batch(vec![
                BatchEntry::Url("not a url".to_string()),
                BatchEntry::Url("https://b.com".to_string()),
            ])
            .await
            .unwrap();

        assert_eq!(
            items,
            vec![BatchItem::Rejected {
                long_url: json!("not a url"),
                message: INVALID_URL_MESSAGE.to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_batch_existing_url_is_not_duplicated() {
        let mut repo = MockRecordRepository::new();
        let existing = record(15_000, "https://a.com", "5ab");
        repo.expect_find_by_long_url()
            .withf(|url| url == "https://a.com")
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_long_url()
            .withf(|url| url == "https://b.com")
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_record| new_record.long_url == "https://b.com")
            .times(1)
            .returning(stored);

        let mut counter = MockCounterStore::new();
        counter.expect_increment().times(1).returning(|| Ok(1));

        let service = service(repo, counter);

        let items = service
            .shorten_batch(vec![
                BatchEntry::Url("https://a.com".to_string()),
                BatchEntry::Url("https://b.com".to_string()),
            ])
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            BatchItem::Shortened(ShortLink {
                long_url: "https://a.com".to_string(),
                short_url: "https://dwarf.test/5ab".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_shorten_batch_ignores_code() {
        let mut repo = MockRecordRepository::new();
        repo.expect_find_by_code().times(0);
        repo.expect_find_by_long_url().times(1).returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_record| new_record.code != "promo")
            .times(1)
            .returning(stored);

        let service = service(repo, counter_returning(1));

        let outcome = service
            .shorten(
                ShortenInput::Batch(vec![BatchEntry::Url("https://a.com".to_string())]),
                Some("promo".to_string()),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, ShortenOutcome::Batch(items) if items.len() == 1));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = service(MockRecordRepository::new(), MockCounterStore::new());
        assert_eq!(service.short_url("abc"), "https://dwarf.test/abc");
    }
}
