//! SQLite storage implementation
//!
//! This module provides a SQLite-backed implementation of the `DedupGate`
//! trait.

use crate::farm_id::FarmId;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DedupGate, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite dedup backend
///
/// The connection sits behind a mutex so one gate can be shared by every
/// running page-walk.
pub struct SqliteDedupGate {
    conn: Mutex<Connection>,
}

impl SqliteDedupGate {
    /// Opens or creates a dedup database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteDedupGate)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DedupGate for SqliteDedupGate {
    fn add_if_absent(&self, farm_id: &FarmId, score: i64) -> StorageResult<u64> {
        let now = Utc::now().to_rfc3339();
        let added = self.conn().execute(
            "INSERT OR IGNORE INTO farm_ids (farm_id, score, discovered_at) VALUES (?1, ?2, ?3)",
            params![farm_id.as_str(), score, now],
        )?;
        Ok(added as u64)
    }

    fn contains(&self, farm_id: &FarmId) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "SELECT 1 FROM farm_ids WHERE farm_id = ?1",
                params![farm_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM farm_ids", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn freshest(&self, limit: usize) -> StorageResult<Vec<(FarmId, i64)>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT farm_id, score FROM farm_ids ORDER BY score DESC LIMIT ?1")?;

        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok((FarmId::new(row.get::<_, String>(0)?), row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(id: &str) -> FarmId {
        FarmId::new(id)
    }

    #[test]
    fn test_create_in_memory() {
        let gate = SqliteDedupGate::new_in_memory();
        assert!(gate.is_ok());
    }

    #[test]
    fn test_add_if_absent_new_id() {
        let gate = SqliteDedupGate::new_in_memory().unwrap();
        let id = farm("1H0thB");
        assert_eq!(gate.add_if_absent(&id, id.score().unwrap()).unwrap(), 1);
        assert!(gate.contains(&id).unwrap());
    }

    #[test]
    fn test_add_if_absent_duplicate() {
        let gate = SqliteDedupGate::new_in_memory().unwrap();
        let id = farm("AAA111");

        assert_eq!(gate.add_if_absent(&id, 10).unwrap(), 1);
        assert_eq!(gate.add_if_absent(&id, 10).unwrap(), 0);
        assert_eq!(gate.count().unwrap(), 1);
    }

    #[test]
    fn test_contains_unknown() {
        let gate = SqliteDedupGate::new_in_memory().unwrap();
        assert!(!gate.contains(&farm("ZZZ999")).unwrap());
    }

    #[test]
    fn test_freshest_orders_by_score() {
        let gate = SqliteDedupGate::new_in_memory().unwrap();
        for id in ["100000", "1H0thB", "1a0000", "Z00000"] {
            let id = farm(id);
            gate.add_if_absent(&id, id.score().unwrap()).unwrap();
        }

        let freshest = gate.freshest(2).unwrap();
        let ids: Vec<&str> = freshest.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["Z00000", "1H0thB"]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farm_ids.db");

        {
            let gate = SqliteDedupGate::new(&path).unwrap();
            gate.add_if_absent(&farm("1ABCDE"), 1).unwrap();
        }

        let gate = SqliteDedupGate::new(&path).unwrap();
        assert!(gate.contains(&farm("1ABCDE")).unwrap());
        assert_eq!(gate.add_if_absent(&farm("1ABCDE"), 1).unwrap(), 0);
    }
}
