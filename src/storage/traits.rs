//! Storage traits and error types
//!
//! This module defines the dedup gate interface used by the spider and the
//! errors storage backends report.

use crate::farm_id::FarmId;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persistent set of farm ids already tracked by the spider
///
/// Any store with an atomic add-if-absent and an orderable score satisfies
/// this. Membership is what drives dedup; the score only lets callers list
/// the freshest ids first.
pub trait DedupGate: Send + Sync {
    /// Adds a farm id unless it is already present
    ///
    /// # Returns
    ///
    /// The number of ids added: 1 for a new id, 0 if it was already tracked
    fn add_if_absent(&self, farm_id: &FarmId, score: i64) -> StorageResult<u64>;

    /// Checks whether a farm id is tracked
    fn contains(&self, farm_id: &FarmId) -> StorageResult<bool>;

    /// Counts tracked farm ids
    fn count(&self) -> StorageResult<u64>;

    /// Lists up to `limit` tracked ids, highest score first
    fn freshest(&self, limit: usize) -> StorageResult<Vec<(FarmId, i64)>>;
}
