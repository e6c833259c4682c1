//! Pure helpers used by the shortening and lookup services.
//!
//! - [`base58`] - counter value to short code encoding
//! - [`url_validator`] - long URL shape check
//! - [`code_rules`] - caller-supplied code validation

pub mod base58;
pub mod code_rules;
pub mod url_validator;
