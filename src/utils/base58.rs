//! Base-58 encoding of counter values into short codes.
//!
//! The alphabet leaves out the symbols that are easy to misread in a URL
//! (`0`, `O`, `I` and `l`). Symbol index equals digit value, so `'1'` is the
//! zero digit.

use thiserror::Error;

/// Digits 1-9, lowercase without `l`, uppercase without `I` and `O`.
pub const ALPHABET: &[u8; 58] = b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

const BASE: u64 = ALPHABET.len() as u64;

/// Reasons a string cannot be decoded back into a counter value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCode {
    #[error("code is empty")]
    Empty,
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("code {0:?} does not fit in 64 bits")]
    Overflow(String),
}

/// Encodes `n` most-significant digit first.
///
/// `encode(0)` is `"1"`, the zero symbol, so every value has a non-empty code.
///
/// # Examples
///
/// ```
/// use dwarf::utils::base58::encode;
///
/// assert_eq!(encode(0), "1");
/// assert_eq!(encode(57), "Z");
/// assert_eq!(encode(58), "21");
/// ```
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return char::from(ALPHABET[0]).to_string();
    }

    let mut digits = Vec::with_capacity(11);
    while n > 0 {
        digits.push(ALPHABET[(n % BASE) as usize]);
        n /= BASE;
    }

    digits.iter().rev().map(|&b| char::from(b)).collect()
}

/// Decodes a code produced by [`encode`].
///
/// Leading zero symbols are accepted (`"11"` decodes to `0`), but only
/// canonical codes survive a decode/encode round trip unchanged.
///
/// # Errors
///
/// Returns [`InvalidCode`] for the empty string, for any character outside
/// [`ALPHABET`], and for values larger than `u64::MAX`.
pub fn decode(code: &str) -> Result<u64, InvalidCode> {
    if code.is_empty() {
        return Err(InvalidCode::Empty);
    }

    code.chars()
        .enumerate()
        .try_fold(0u64, |acc, (position, character)| {
            let digit = digit_value(character)
                .ok_or(InvalidCode::InvalidCharacter {
                    character,
                    position,
                })?;

            acc.checked_mul(BASE)
                .and_then(|value| value.checked_add(digit))
                .ok_or_else(|| InvalidCode::Overflow(code.to_string()))
        })
}

fn digit_value(character: char) -> Option<u64> {
    if !character.is_ascii() {
        return None;
    }

    ALPHABET
        .iter()
        .position(|&b| b == character as u8)
        .map(|index| index as u64)
}
