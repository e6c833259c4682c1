//! Business logic services for the application layer.

pub mod auth_service;
pub mod counter_service;
pub mod lookup_service;
pub mod shorten_service;

pub use auth_service::AuthService;
pub use counter_service::CounterService;
pub use lookup_service::LookupService;
pub use shorten_service::{
    BatchEntry, BatchItem, ShortLink, ShortenInput, ShortenOutcome, ShortenService,
};
