//! PostgreSQL implementation of the record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::domain::entities::{NewShortUrl, ShortUrlRecord};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    long_url: String,
    code: String,
    created: DateTime<Utc>,
}

impl From<ShortUrlRow> for ShortUrlRecord {
    fn from(row: ShortUrlRow) -> Self {
        ShortUrlRecord::new(row.id, row.long_url, row.code, row.created)
    }
}

/// PostgreSQL repository for short URL records.
///
/// `short_urls.id` is the primary key and `short_urls.code` carries a UNIQUE
/// constraint, so a lost check-then-insert race surfaces as
/// [`AppError::Conflict`].
pub struct PgRecordRepository {
    pool: Arc<PgPool>,
}

impl PgRecordRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Applies pending migrations from `./migrations`.
    ///
    /// # Errors
    ///
    /// Returns the migrator error if a migration fails.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for PgRecordRepository {
    async fn insert(&self, new_record: NewShortUrl) -> Result<ShortUrlRecord, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            INSERT INTO short_urls (id, long_url, code)
            VALUES ($1, $2, $3)
            RETURNING id, long_url, code, created
            "#,
        )
        .bind(new_record.id)
        .bind(new_record.long_url)
        .bind(new_record.code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, long_url, code, created
            FROM short_urls
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, long_url, code, created
            FROM short_urls
            WHERE long_url = $1
            ORDER BY created, id
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }

    async fn disconnect(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
