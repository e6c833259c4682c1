//! Infrastructure layer for external integrations.
//!
//! This layer implements the store traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`counter`] - Counter stores (Redis and in-memory)
//! - [`persistence`] - Record stores (PostgreSQL and in-memory)

pub mod counter;
pub mod persistence;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::config::{Config, StoreBackend};
use crate::domain::repositories::{CounterStore, RecordRepository};
use counter::{MemoryCounterStore, RedisCounterStore};
use persistence::{MemoryRecordRepository, PgRecordRepository};

/// Connected store handles shared by the services.
#[derive(Clone)]
pub struct Stores {
    pub records: Arc<dyn RecordRepository>,
    pub counter: Arc<dyn CounterStore>,
}

impl Stores {
    /// Fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            records: Arc::new(MemoryRecordRepository::new()),
            counter: Arc::new(MemoryCounterStore::new()),
        }
    }

    /// Releases store resources. Safe to call more than once.
    pub async fn disconnect(&self) {
        self.records.disconnect().await;
    }
}

/// Backoff used for startup connections: 500ms, 1s, 2s, ... capped at 10s.
fn retry_strategy(attempts: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(250)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(attempts.saturating_sub(1))
}

/// Connects the stores selected by `config.store_backend`.
///
/// For the postgres backend, the pool and the Redis counter are each retried
/// with exponential backoff, then pending migrations are applied.
///
/// # Errors
///
/// Returns an error if a store is still unreachable after
/// `config.connect_retries` attempts or a migration fails.
pub async fn connect_stores(config: &Config) -> Result<Stores> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; records are lost on restart");
            Ok(Stores::in_memory())
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = Retry::start(retry_strategy(config.connect_retries), || async {
                PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                    .connect(database_url)
                    .await
                    .inspect_err(|e| tracing::warn!("Database connection failed: {}", e))
            })
            .await
            .context("Failed to connect to PostgreSQL")?;
            tracing::info!("Connected to database");

            let records = PgRecordRepository::new(Arc::new(pool));
            records
                .migrate()
                .await
                .context("Failed to run database migrations")?;

            let counter = Retry::start(retry_strategy(config.connect_retries), || async {
                RedisCounterStore::connect(&config.redis_url, config.counter_key.clone())
                    .await
                    .inspect_err(|e| tracing::warn!("{}", e))
            })
            .await
            .context("Failed to connect to Redis")?;

            Ok(Stores {
                records: Arc::new(records),
                counter: Arc::new(counter),
            })
        }
    }
}
