//! Rules for caller-supplied short codes.

use crate::error::AppError;

/// Longest code a caller may choose.
pub const MAX_CODE_LENGTH: usize = 64;

/// Path segments served by fixed routes; a code with one of these names
/// could never be reached through `GET /{code}`.
pub const RESERVED_CODES: &[&str] = &["create", "health"];

/// Returns `true` if `code` collides with a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns `true` if `code` has an acceptable length and only uses
/// ASCII letters, digits, `-` and `_`.
pub fn is_well_formed(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validates a caller-supplied short code.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if the code is malformed or reserved.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !is_well_formed(code) {
        return Err(AppError::invalid_input(format!(
            "code must be 1-{} characters of letters, digits, '-' or '_'",
            MAX_CODE_LENGTH
        )));
    }

    if is_reserved_code(code) {
        return Err(AppError::invalid_input(format!("code '{}' is reserved", code)));
    }

    Ok(())
}
