//! Storage module for pipeline results and spider dedup
//!
//! This module contains:
//! - The in-memory `ResultStore` that holds every farm record produced
//! - The `DedupGate` trait for tracking farm ids across spider runs
//! - A SQLite implementation of that trait

mod results;
mod schema;
mod sqlite;
mod traits;

pub use results::ResultStore;
pub use sqlite::SqliteDedupGate;
pub use traits::{DedupGate, StorageError, StorageResult};

use std::path::Path;
use std::sync::Arc;

/// Opens the dedup database, if one is configured
///
/// Dedup is optional: a missing path or a database that fails to open both
/// yield `None`, and spidering carries on without cross-run dedup.
///
/// # Arguments
///
/// * `path` - Optional path to the SQLite database file
pub fn open_dedup_gate(path: Option<&Path>) -> Option<Arc<dyn DedupGate>> {
    let path = path?;
    match SqliteDedupGate::new(path) {
        Ok(gate) => {
            tracing::info!("Opened dedup database at {}", path.display());
            Some(Arc::new(gate))
        }
        Err(e) => {
            tracing::warn!(
                "Could not open dedup database at {}: {}; spidering without dedup",
                path.display(),
                e
            );
            None
        }
    }
}
