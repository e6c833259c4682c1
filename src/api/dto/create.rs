//! DTOs for the create endpoint.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use validator::Validate;

use crate::application::services::{BatchEntry, BatchItem, ShortLink, ShortenInput, ShortenOutcome};
use crate::error::AppError;
use crate::utils::code_rules::MAX_CODE_LENGTH;
use crate::utils::url_validator::NOT_A_STRING_MESSAGE;

pub const MISSING_LONG_URL_MESSAGE: &str = "You need to send a longUrl to be shorten";
pub const CODE_NOT_A_STRING_MESSAGE: &str = "code must be a string";

/// Body of `POST /create`.
///
/// `apiKey` and `longUrl` are kept as raw JSON: a key of the wrong type is
/// just an invalid key, and `longUrl` arrays with mixed element types are
/// answered entry by entry.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[serde(default)]
    pub api_key: Option<Value>,

    #[serde(default)]
    pub long_url: Option<Value>,

    #[serde(default, deserialize_with = "code_from_value")]
    #[validate(length(
        max = (MAX_CODE_LENGTH as u64),
        message = "code must be at most 64 characters"
    ))]
    pub code: Option<String>,
}

impl CreateRequest {
    /// Reads a request from an already parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the body is not an object or
    /// `code` is a non-string value.
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        serde_json::from_value(body).map_err(|e| AppError::invalid_input(e.to_string()))
    }

    /// Splits the request into the service input and the optional code.
    ///
    /// # Errors
    ///
    /// - [`MISSING_LONG_URL_MESSAGE`] when `longUrl` is absent, `null`,
    ///   `false`, `0` or `""`
    /// - [`NOT_A_STRING_MESSAGE`] for any other non-string, non-array value
    pub fn into_input(self) -> Result<(ShortenInput, Option<String>), AppError> {
        let input = match self.long_url {
            None => return Err(AppError::invalid_input(MISSING_LONG_URL_MESSAGE)),
            Some(value) if is_falsy(&value) => {
                return Err(AppError::invalid_input(MISSING_LONG_URL_MESSAGE));
            }
            Some(Value::String(url)) => ShortenInput::Single(url),
            Some(Value::Array(values)) => {
                ShortenInput::Batch(values.into_iter().map(batch_entry).collect())
            }
            Some(_) => return Err(AppError::invalid_input(NOT_A_STRING_MESSAGE)),
        };

        Ok((input, self.code))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

// Falsy values mean "no code"; other non-strings are rejected.
fn code_from_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(code)) => Ok(Some(code)),
        Some(value) if !is_falsy(&value) => Err(de::Error::custom(CODE_NOT_A_STRING_MESSAGE)),
        _ => Ok(None),
    }
}

fn batch_entry(value: Value) -> BatchEntry {
    match value {
        Value::String(url) => BatchEntry::Url(url),
        other => BatchEntry::NotAString(other),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlBody {
    pub long_url: String,
    pub short_url: String,
}

impl From<ShortLink> for ShortUrlBody {
    fn from(link: ShortLink) -> Self {
        Self {
            long_url: link.long_url,
            short_url: link.short_url,
        }
    }
}

/// Batch element: a short URL, or the error that ended the batch.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItemBody {
    Shortened(ShortUrlBody),
    Rejected {
        #[serde(rename = "longUrl")]
        long_url: Value,
        error: bool,
        message: String,
    },
}

impl From<BatchItem> for BatchItemBody {
    fn from(item: BatchItem) -> Self {
        match item {
            BatchItem::Shortened(link) => Self::Shortened(link.into()),
            BatchItem::Rejected { long_url, message } => Self::Rejected {
                long_url,
                error: true,
                message,
            },
        }
    }
}

/// Response of `POST /create`; an object for a single URL, an array for a batch.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateResponse {
    Single(ShortUrlBody),
    Batch(Vec<BatchItemBody>),
}

impl From<ShortenOutcome> for CreateResponse {
    fn from(outcome: ShortenOutcome) -> Self {
        match outcome {
            ShortenOutcome::Single(link) => Self::Single(link.into()),
            ShortenOutcome::Batch(items) => {
                Self::Batch(items.into_iter().map(BatchItemBody::from).collect())
            }
        }
    }
}
