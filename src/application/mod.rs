//! Application layer services implementing business logic.
//!
//! Services consume the repository traits from [`crate::domain`] and give the
//! HTTP handlers and the admin tool a storage-agnostic API.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - validation, dedup and code generation
//! - [`services::lookup_service::LookupService`] - code resolution
//! - [`services::counter_service::CounterService`] - counter values with random offset
//! - [`services::auth_service::AuthService`] - API key check

pub mod services;
