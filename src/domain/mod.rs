//! Domain layer: entities and the storage contracts the services depend on.
//!
//! - [`entities`] - [`entities::ShortUrlRecord`] and its insert payload
//! - [`repositories`] - record store and counter store traits
//!
//! Nothing here depends on PostgreSQL or Redis.

pub mod entities;
pub mod repositories;
