//! Counter store implementations.
//!
//! - [`RedisCounterStore`] - shared counter under a Redis key
//! - [`MemoryCounterStore`] - process-local atomic for development and tests

mod memory_counter_store;
mod redis_counter_store;

pub use memory_counter_store::MemoryCounterStore;
pub use redis_counter_store::RedisCounterStore;
