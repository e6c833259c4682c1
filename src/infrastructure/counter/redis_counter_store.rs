//! Redis-backed counter store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::repositories::CounterStore;
use crate::error::AppError;

/// Counter kept under a single Redis key and advanced with `INCR`.
///
/// `INCR` is atomic on the server, so values are unique across every
/// process sharing the key and survive restarts with the Redis data set.
pub struct RedisCounterStore {
    client: ConnectionManager,
    key: String,
}

impl RedisCounterStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379/0"`)
    /// - `key` - key holding the counter (e.g., `"dwarf:counter"`)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CounterUnavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, key: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::open(redis_url).map_err(|e| {
            AppError::counter_unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            AppError::counter_unavailable(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| AppError::counter_unavailable(format!("Redis PING failed: {}", e)))?;

        let key = key.into();
        info!("Connected to Redis counter store (key {})", key);

        Ok(Self {
            client: manager,
            key,
        })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self) -> Result<i64, AppError> {
        let mut conn = self.client.clone();
        let value: i64 = conn.incr(&self.key, 1).await?;
        debug!("Counter {} -> {}", self.key, value);
        Ok(value)
    }

    async fn current(&self) -> Result<i64, AppError> {
        let mut conn = self.client.clone();
        let value: Option<i64> = conn.get(&self.key).await?;
        Ok(value.unwrap_or(0))
    }

    async fn set(&self, value: i64) -> Result<(), AppError> {
        let mut conn = self.client.clone();
        conn.set::<_, _, ()>(&self.key, value).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
