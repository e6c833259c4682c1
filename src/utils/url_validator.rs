//! Syntactic long-URL check.
//!
//! Accepts `http(s)://(www.)domain.ext(/)(path)`: a scheme, at least one
//! domain label, a dot and a top-level label. No DNS or reachability checks.

use regex::Regex;
use std::sync::LazyLock;

/// Message returned to clients when a long URL fails [`is_valid_url`].
pub const INVALID_URL_MESSAGE: &str = "Invalid URL format. Input URL must comply to the following: http(s)://(www.)domain.ext(/)(path)";

/// Message returned to clients when a long URL is not a JSON string.
pub const NOT_A_STRING_MESSAGE: &str = "longUrl is not a string";

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(\S+\.)?(\S+\.)(\S+)\S*").unwrap());

/// Returns `true` when `url` looks like an absolute http(s) URL with a dotted host.
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_https() {
        assert!(is_valid_url("https://example.com"));
    }

    #[test]
    fn test_accepts_path_and_query() {
        assert!(is_valid_url("http://a.b/c?d=e"));
        assert!(is_valid_url("https://www.example.co.uk/some/path?x=1#frag"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("mailto:user@example.com"));
        assert!(!is_valid_url("httpss://example.com"));
    }

    #[test]
    fn test_rejects_free_text() {
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_rejects_host_without_dot() {
        assert!(!is_valid_url("http://localhost"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert!(!is_valid_url("HTTPS://example.com"));
    }
}
