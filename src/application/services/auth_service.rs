//! Shared-secret check for the create endpoint.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Message returned when the API key is missing or wrong.
pub const INVALID_API_KEY_MESSAGE: &str = "You need to send a valid apiKey";

/// Compares request API keys against the configured secret.
///
/// Both sides are passed through HMAC-SHA256 under a per-process random key
/// and compared with [`Mac::verify_slice`], which runs in constant time.
pub struct AuthService {
    mac_key: [u8; 32],
    expected: Vec<u8>,
}

impl AuthService {
    /// Creates a new authentication service for `api_key`.
    pub fn new(api_key: &str) -> Self {
        let mut mac_key = [0u8; 32];
        rand::rng().fill_bytes(&mut mac_key);

        let expected = Self::mac(&mac_key, api_key).finalize().into_bytes().to_vec();

        Self { mac_key, expected }
    }

    fn mac(mac_key: &[u8], value: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(mac_key).expect("HMAC accepts any key length");
        mac.update(value.as_bytes());
        mac
    }

    /// Checks a candidate API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is missing, empty or different.
    pub fn authenticate(&self, candidate: Option<&str>) -> Result<(), AppError> {
        let candidate = candidate
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::unauthorized(INVALID_API_KEY_MESSAGE))?;

        Self::mac(&self.mac_key, candidate)
            .verify_slice(&self.expected)
            .map_err(|_| AppError::unauthorized(INVALID_API_KEY_MESSAGE))
    }
}
