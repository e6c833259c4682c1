//! Storage traits for the domain layer.
//!
//! Traits define the contract; implementations live in
//! `crate::infrastructure`. Mocks are generated with `mockall` for unit tests.
//!
//! - [`RecordRepository`] - short URL records (document store)
//! - [`CounterStore`] - shared atomic counter

pub mod counter_store;
pub mod record_repository;

pub use counter_store::CounterStore;
pub use record_repository::RecordRepository;

#[cfg(test)]
pub use counter_store::MockCounterStore;
#[cfg(test)]
pub use record_repository::MockRecordRepository;
