//! CORS policy built from the origin whitelist.

use axum::http::{HeaderValue, Method};
use regex::Regex;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// One whitelist entry.
#[derive(Debug, Clone)]
pub enum OriginRule {
    Exact(String),
    /// Written as `/pattern/` in the whitelist; matched unanchored.
    Pattern(Regex),
}

impl OriginRule {
    /// Parses one entry of the comma-separated whitelist.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a `/pattern/` entry does not compile.
    pub fn parse(entry: &str) -> Result<Self, regex::Error> {
        let entry = entry.trim();

        match entry
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(pattern) if !pattern.is_empty() => {
                Regex::new(&pattern.replace("\\\\", "\\")).map(Self::Pattern)
            }
            _ => Ok(Self::Exact(entry.to_string())),
        }
    }

    pub fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Exact(allowed) => allowed == origin,
            Self::Pattern(re) => re.is_match(origin),
        }
    }
}

/// Parses the whitelist; `None` means any origin is allowed.
///
/// # Errors
///
/// Returns the first regex entry that fails to compile.
pub fn parse_whitelist(whitelist: &str) -> Result<Option<Vec<OriginRule>>, regex::Error> {
    let whitelist = whitelist.trim();
    if whitelist.is_empty() || whitelist == "*" {
        return Ok(None);
    }

    whitelist
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(OriginRule::parse)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Builds the CORS layer for `CORS_WHITELIST`.
///
/// `*` mirrors the request origin. Otherwise only listed origins are
/// answered with `Access-Control-Allow-Origin`.
///
/// # Errors
///
/// Returns an error if a `/pattern/` entry is not a valid regex.
pub fn layer(whitelist: &str) -> Result<CorsLayer, regex::Error> {
    let allow_origin = match parse_whitelist(whitelist)? {
        None => AllowOrigin::mirror_request(),
        Some(rules) => AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| rules.iter().any(|rule| rule.matches(origin)))
                .unwrap_or(false)
        }),
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request()))
}
