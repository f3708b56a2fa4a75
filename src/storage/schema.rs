//! Database schema definitions
//!
//! This module contains the SQL schema for the farm id dedup database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Farm ids already tracked by a spider run, scored by their base-62 value
CREATE TABLE IF NOT EXISTS farm_ids (
    farm_id TEXT PRIMARY KEY,
    score INTEGER NOT NULL,
    discovered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_farm_ids_score ON farm_ids(score);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
