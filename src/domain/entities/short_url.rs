//! Short URL record: the persisted mapping between a code and a long URL.

use chrono::{DateTime, Utc};

/// A stored short URL mapping.
///
/// Records are written once by the shortening service and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlRecord {
    /// Counter value drawn when the record was created; primary key.
    pub id: i64,
    pub long_url: String,
    pub code: String,
    pub created: DateTime<Utc>,
}

impl ShortUrlRecord {
    /// Creates a new ShortUrlRecord instance.
    pub fn new(id: i64, long_url: String, code: String, created: DateTime<Utc>) -> Self {
        Self {
            id,
            long_url,
            code,
            created,
        }
    }
}

/// Input data for inserting a record. The store assigns `created`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortUrl {
    pub id: i64,
    pub long_url: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let now = Utc::now();
        let record = ShortUrlRecord::new(
            10_042,
            "https://example.com".to_string(),
            "3Gq".to_string(),
            now,
        );

        assert_eq!(record.id, 10_042);
        assert_eq!(record.long_url, "https://example.com");
        assert_eq!(record.code, "3Gq");
        assert_eq!(record.created, now);
    }

    #[test]
    fn test_new_short_url_creation() {
        let new_record = NewShortUrl {
            id: 7,
            long_url: "https://rust-lang.org".to_string(),
            code: "rust".to_string(),
        };

        assert_eq!(new_record.code, "rust");
        assert_eq!(new_record.long_url, "https://rust-lang.org");
    }
}
