//! In-memory result store
//!
//! The result store maps each farm id to the record produced for it. It lives
//! for the whole process and never evicts.

use crate::farm_id::FarmId;
use crate::state::FarmStats;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Concurrency-safe map from farm id to its statistics record
///
/// Every method takes the lock for a single read or write. Callers are
/// expected to check `contains` before producing a record, but `upsert`
/// itself is last-write-wins.
#[derive(Debug, Default)]
pub struct ResultStore {
    farms: Mutex<HashMap<FarmId, FarmStats>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for its farm id
    pub fn upsert(&self, stats: FarmStats) {
        let farm_id = stats.farm_id().clone();
        self.lock().insert(farm_id, stats);
    }

    pub fn contains(&self, farm_id: &FarmId) -> bool {
        self.lock().contains_key(farm_id)
    }

    /// Returns a copy of the record for a farm id, if one exists
    pub fn get(&self, farm_id: &FarmId) -> Option<FarmStats> {
        self.lock().get(farm_id).cloned()
    }

    /// Copies every current record
    pub fn snapshot(&self) -> HashMap<FarmId, FarmStats> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<FarmId, FarmStats>> {
        self.farms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
