//! In-process counter store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::repositories::CounterStore;
use crate::error::AppError;

/// Counter held in an atomic integer. Not shared between processes and
/// reset on restart; use [`super::RedisCounterStore`] in production.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    value: AtomicI64,
}

impl MemoryCounterStore {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter starting at `value`.
    pub fn with_value(value: i64) -> Self {
        Self {
            value: AtomicI64::new(value),
        }
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self) -> Result<i64, AppError> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn current(&self) -> Result<i64, AppError> {
        Ok(self.value.load(Ordering::SeqCst))
    }

    async fn set(&self, value: i64) -> Result<(), AppError> {
        self.value.store(value, Ordering::SeqCst);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_is_strictly_increasing() {
        let store = MemoryCounterStore::new();

        let mut previous = store.current().await.unwrap();
        for _ in 0..1_000 {
            let next = store.increment().await.unwrap();
            assert!(next > previous);
            previous = next;
        }
        assert_eq!(store.current().await.unwrap(), 1_000);
    }

    #[tokio::test]
    async fn test_set_and_with_value() {
        let store = MemoryCounterStore::with_value(41);
        assert_eq!(store.increment().await.unwrap(), 42);

        store.set(100).await.unwrap();
        assert_eq!(store.increment().await.unwrap(), 101);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_unique() {
        let store = std::sync::Arc::new(MemoryCounterStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut values = Vec::with_capacity(250);
                    for _ in 0..250 {
                        values.push(store.increment().await.unwrap());
                    }
                    values
                })
            })
            .collect();

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        all.sort_unstable();
        all.dedup();

        assert_eq!(all.len(), 2_000);
    }
}
