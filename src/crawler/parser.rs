//! Document parsers for farm pages, listing pages, and the recents feed
//!
//! This module handles extracting:
//! - Villager name/score pairs from a farm page
//! - Farm ids from the image references on a listing page
//! - Farm ids from the entries of the recents JSON feed

use crate::farm_id::FarmId;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Reasons a document yielded nothing usable
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no farm ids found on listing page")]
    NoIdentifiersFound,

    #[error("no villager scores found on farm page")]
    ParseEmpty,

    #[error("recents feed is not a JSON array of strings: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Matches one villager tooltip, e.g. `><br>Abigail: 7/10'>`
fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"><br>([A-Z][a-z]+): ([0-9]+)/10'>").expect("attribute pattern is valid")
    })
}

/// Matches one farm thumbnail reference, e.g. `/1H0thB-f.png`
fn listing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/([A-Za-z0-9]{6})-f\.png").expect("listing pattern is valid")
    })
}

/// Extracts villager name and score text pairs from a farm page
///
/// Score text is returned unvalidated; range checks belong to the caller.
///
/// # Errors
///
/// * `ExtractError::ParseEmpty` - the page contains no villager scores
///
/// # Example
///
/// ```
/// use farmstats::crawler::extract_attributes;
///
/// let html = "<i title='><br>Abigail: 7/10'></i><i title='><br>Sam: 3/10'></i>";
/// let pairs = extract_attributes(html).unwrap();
/// assert_eq!(pairs, vec![
///     ("Abigail".to_string(), "7".to_string()),
///     ("Sam".to_string(), "3".to_string()),
/// ]);
/// ```
pub fn extract_attributes(body: &str) -> Result<Vec<(String, String)>, ExtractError> {
    let pairs: Vec<(String, String)> = attribute_pattern()
        .captures_iter(body)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();

    if pairs.is_empty() {
        return Err(ExtractError::ParseEmpty);
    }

    Ok(pairs)
}

/// Extracts farm ids from a listing page, in page order
///
/// Listing ids skip the required-prefix check applied to external input.
///
/// # Errors
///
/// * `ExtractError::NoIdentifiersFound` - no thumbnail reference matched
pub fn extract_listing_ids(body: &str) -> Result<Vec<FarmId>, ExtractError> {
    let ids: Vec<FarmId> = listing_pattern()
        .captures_iter(body)
        .map(|caps| FarmId::new(&caps[1]))
        .collect();

    if ids.is_empty() {
        return Err(ExtractError::NoIdentifiersFound);
    }

    Ok(ids)
}

/// Extracts farm ids from the recents JSON feed
///
/// Entries that are too short or lack `prefix` are skipped.
///
/// # Errors
///
/// * `ExtractError::InvalidJson` - the body is not a JSON array of strings
pub fn extract_recent_ids(body: &str, prefix: char) -> Result<Vec<FarmId>, ExtractError> {
    let entries: Vec<String> = serde_json::from_str(body)?;

    let mut ids = Vec::with_capacity(entries.len());
    for entry in &entries {
        match FarmId::from_entry(entry, prefix) {
            Ok(id) => {
                tracing::debug!("{} -> {}", entry, id);
                ids.push(id);
            }
            Err(e) => tracing::info!("unexpected recents entry [{}]: {}", entry, e),
        }
    }

    Ok(ids)
}
