//! Core domain entities.
//!
//! - [`ShortUrlRecord`] - a stored code to long URL mapping
//! - [`NewShortUrl`] - insert payload for a record

pub mod short_url;

pub use short_url::{NewShortUrl, ShortUrlRecord};
