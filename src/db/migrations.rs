//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;
use tracing::info;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Highest applied migration, 0 for a fresh database
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

pub fn latest_schema_version() -> i32 {
    SCHEMA_VERSION
}

/// Migration v1: profile and store directory
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILE
        -- Single-row biometric profile (id is always 1)
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            height_cm REAL NOT NULL CHECK (height_cm > 0),
            weight_kg REAL NOT NULL CHECK (weight_kg > 0),
            age_years INTEGER NOT NULL,
            sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
            activity_factor REAL NOT NULL DEFAULT 1.2,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- STORES
        -- Directory snapshot used for nearby searches
        -- ============================================
        CREATE TABLE stores (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NOT NULL DEFAULT '',
            latitude REAL NOT NULL CHECK (latitude BETWEEN -90 AND 90),
            longitude REAL NOT NULL CHECK (longitude BETWEEN -180 AND 180),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_stores_name ON stores(name);

        -- Item names carried by each store, kept in insertion order
        CREATE TABLE store_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            store_id TEXT NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
            name TEXT NOT NULL
        );

        CREATE INDEX idx_store_items_store ON store_items(store_id);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), latest_schema_version());
    }

    #[test]
    fn test_profile_rejects_non_positive_height() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO profile (id, height_cm, weight_kg, age_years, sex) VALUES (1, 0, 70, 30, 'male')",
            [],
        );
        assert!(result.is_err());
    }
}
