//! Record repository implementations.
//!
//! - [`PgRecordRepository`] - PostgreSQL via SQLx
//! - [`MemoryRecordRepository`] - in-process maps for development and tests

pub mod memory_record_repository;
pub mod pg_record_repository;

pub use memory_record_repository::MemoryRecordRepository;
pub use pg_record_repository::PgRecordRepository;
