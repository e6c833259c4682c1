//! Counter values for code generation.

use rand::Rng;
use std::ops::Range;
use std::sync::Arc;
use tracing::info;

use crate::domain::repositories::CounterStore;
use crate::error::AppError;

/// Range of the random offset added to every raw counter value.
pub const OFFSET_RANGE: Range<i64> = 9_999..999_999;

/// Issues counter values for new records.
///
/// Each value is the result of an atomic increment in the shared
/// [`CounterStore`] plus a uniformly drawn offset from [`OFFSET_RANGE`], so
/// consecutive codes are not sequential. Sums from different increments can
/// coincide; the shortening service retries on the resulting store conflict.
pub struct CounterService<C: CounterStore + ?Sized> {
    store: Arc<C>,
}

impl<C: CounterStore + ?Sized> CounterService<C> {
    /// Creates a new counter service.
    pub fn new(store: Arc<C>) -> Self {
        Self { store }
    }

    /// Draws the next value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CounterUnavailable`] if the store cannot increment.
    pub async fn next(&self) -> Result<i64, AppError> {
        let raw = self.store.increment().await?;
        let offset = rand::rng().random_range(OFFSET_RANGE);

        raw.checked_add(offset)
            .ok_or_else(|| AppError::internal(format!("counter overflow at {}", raw)))
    }

    /// Returns the raw counter value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CounterUnavailable`] if the store is unreachable.
    pub async fn current(&self) -> Result<i64, AppError> {
        self.store.current().await
    }

    /// Raises the raw counter to at least `floor` and returns the resulting value.
    ///
    /// Read-then-write; meant for the admin tool, not for concurrent use with
    /// live traffic.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CounterUnavailable`] if the store is unreachable.
    pub async fn prime(&self, floor: i64) -> Result<i64, AppError> {
        let current = self.store.current().await?;
        if current >= floor {
            return Ok(current);
        }

        self.store.set(floor).await?;
        info!("Counter primed from {} to {}", current, floor);
        Ok(floor)
    }
}
