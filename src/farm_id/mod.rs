//! Farm identifier handling
//!
//! This module provides the `FarmId` key type, the validation applied to
//! identifiers that arrive from external input, and the base-62 codec used to
//! derive dedup scores.

mod codec;

pub use codec::{decode, encode, ALPHABET, BASE};

use crate::IdentifierError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters in a farm identifier
pub const FARM_ID_LEN: usize = 6;

/// Opaque farm identifier
///
/// Equality is exact string match. Identifiers scraped from listing pages are
/// trusted as they are; identifiers from the console or the recents feed go
/// through [`FarmId::from_entry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FarmId(String);

impl FarmId {
    /// Wraps an identifier without validation
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives an identifier from an external entry
    ///
    /// The entry must be at least [`FARM_ID_LEN`] characters long and start
    /// with `prefix`. Anything after the first [`FARM_ID_LEN`] characters is
    /// discarded, so `"1BC123.otherstuff"` yields `"1BC123"`.
    ///
    /// # Errors
    ///
    /// * `IdentifierError::TooShort` - entry is shorter than an identifier
    /// * `IdentifierError::BadPrefix` - entry does not start with `prefix`
    /// * `IdentifierError::InvalidCharacter` - the identifier part holds a
    ///   character other than an ASCII letter or digit
    ///
    /// # Examples
    ///
    /// ```
    /// use farmstats::FarmId;
    ///
    /// let id = FarmId::from_entry("1BC123.otherstuff", '1').unwrap();
    /// assert_eq!(id.as_str(), "1BC123");
    /// assert!(FarmId::from_entry("short", '1').is_err());
    /// ```
    pub fn from_entry(entry: &str, prefix: char) -> Result<Self, IdentifierError> {
        let id: String = entry.chars().take(FARM_ID_LEN).collect();
        if id.chars().count() < FARM_ID_LEN {
            return Err(IdentifierError::TooShort {
                entry: entry.to_string(),
                expected: FARM_ID_LEN,
            });
        }
        if !id.starts_with(prefix) {
            return Err(IdentifierError::BadPrefix {
                entry: entry.to_string(),
                expected: prefix,
            });
        }
        if let Some(c) = id.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(IdentifierError::InvalidCharacter(c));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Computes the dedup score for this identifier
    pub fn score(&self) -> Result<i64, IdentifierError> {
        decode(&self.0)
    }
}

impl fmt::Display for FarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FarmId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
