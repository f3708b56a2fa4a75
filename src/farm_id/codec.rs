//! Base-62 codec for farm identifiers
//!
//! Farm identifiers are positional numerals over the alphabet `0-9a-zA-Z`,
//! most-significant character first. The integer form is only used as a
//! sortable score for the dedup store.

use crate::IdentifierError;

/// Digits in ascending value order
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Numeric base of the identifier alphabet
pub const BASE: i64 = ALPHABET.len() as i64;

/// Returns the value of a single alphabet character
fn digit_value(c: char) -> Option<i64> {
    match c {
        '0'..='9' => Some(c as i64 - '0' as i64),
        'a'..='z' => Some(c as i64 - 'a' as i64 + 10),
        'A'..='Z' => Some(c as i64 - 'A' as i64 + 36),
        _ => None,
    }
}

/// Decodes a token into its integer score
///
/// The empty token decodes to 0, as do tokens made only of `'0'`.
///
/// # Errors
///
/// * `IdentifierError::InvalidCharacter` - a character is outside the alphabet
/// * `IdentifierError::Overflow` - the value does not fit in an `i64`
///
/// # Examples
///
/// ```
/// use farmstats::farm_id::decode;
///
/// assert_eq!(decode("1H0thB").unwrap(), 1551627847);
/// assert_eq!(decode("").unwrap(), 0);
/// assert!(decode("abc-123").is_err());
/// ```
pub fn decode(token: &str) -> Result<i64, IdentifierError> {
    token.chars().try_fold(0i64, |acc, c| {
        let digit = digit_value(c).ok_or(IdentifierError::InvalidCharacter(c))?;
        acc.checked_mul(BASE)
            .and_then(|shifted| shifted.checked_add(digit))
            .ok_or_else(|| IdentifierError::Overflow(token.to_string()))
    })
}

/// Encodes an integer score back into a token
///
/// `encode(0)` yields the empty string rather than `"0"`. Dedup scores only
/// need to be consistent, so this asymmetry is kept as is.
///
/// # Errors
///
/// * `IdentifierError::NegativeValue` - `value` is below zero
///
/// # Examples
///
/// ```
/// use farmstats::farm_id::encode;
///
/// assert_eq!(encode(1551627847).unwrap(), "1H0thB");
/// assert_eq!(encode(0).unwrap(), "");
/// ```
pub fn encode(value: i64) -> Result<String, IdentifierError> {
    if value < 0 {
        return Err(IdentifierError::NegativeValue(value));
    }

    let mut digits = Vec::new();
    let mut remaining = value;
    while remaining > 0 {
        digits.push(ALPHABET[(remaining % BASE) as usize]);
        remaining /= BASE;
    }
    digits.reverse();

    // Every byte comes from ALPHABET, which is ASCII
    Ok(digits.into_iter().map(char::from).collect())
}
