//! Store directory model
//!
//! Stores and the item names they carry. Also provides the SQLite-backed
//! [`StoreDirectory`] handed to the matcher.

use std::collections::HashMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{Database, DbError, DbResult};
use crate::stores::{GeoCoordinate, Store, StoreDirectory, StoreError};

/// A persisted store with bookkeeping timestamps
#[derive(Debug, Clone, Serialize)]
pub struct StoreRecord {
    #[serde(flatten)]
    pub store: Store,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or replacing a store (also the import file row format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub items: Vec<String>,
}

impl StoreCreate {
    /// Check the id and coordinates before they reach the database
    pub fn validate(&self) -> Result<GeoCoordinate, StoreError> {
        if self.id.trim().is_empty() {
            return Err(StoreError::MissingStoreId);
        }
        Ok(GeoCoordinate::new(self.latitude, self.longitude)?)
    }
}

struct StoreRow {
    id: String,
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
    created_at: String,
    updated_at: String,
}

impl StoreRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            address: row.get("address")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn into_record(self, items: Vec<String>) -> StoreRecord {
        StoreRecord {
            store: Store {
                id: self.id,
                name: self.name,
                address: self.address,
                coordinates: GeoCoordinate {
                    latitude: self.latitude,
                    longitude: self.longitude,
                },
                items,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl StoreRecord {
    /// Insert a store, or replace its fields and items if the id exists
    pub fn upsert(conn: &Connection, data: &StoreCreate) -> DbResult<Self> {
        data.validate()
            .map_err(|e| DbError::InvalidData(e.to_string()))?;

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO stores (id, name, address, latitude, longitude)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                updated_at = datetime('now')
            "#,
            params![data.id, data.name, data.address, data.latitude, data.longitude],
        )?;
        tx.execute("DELETE FROM store_items WHERE store_id = ?1", [&data.id])?;
        insert_items(&tx, &data.id, &data.items)?;
        tx.commit()?;

        Self::get_by_id(conn, &data.id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a store with its items
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM stores WHERE id = ?1")?;

        let row = match stmt.query_row([id], StoreRow::from_row) {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let items = list_items(conn, id)?;
        Ok(Some(row.into_record(items)))
    }

    /// List stores, optionally filtered by a name substring
    pub fn list(conn: &Connection, query: Option<&str>, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", query.unwrap_or(""));
        let limit = limit.unwrap_or(-1);

        let mut stmt = conn.prepare(
            "SELECT * FROM stores WHERE name LIKE ?1 ORDER BY name ASC, id ASC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![pattern, limit], StoreRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| -> DbResult<Self> {
                let items = list_items(conn, &row.id)?;
                Ok(row.into_record(items))
            })
            .collect()
    }

    /// Append item names to an existing store
    pub fn add_items(conn: &Connection, id: &str, items: &[String]) -> DbResult<Option<Self>> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(None);
        }

        let tx = conn.unchecked_transaction()?;
        insert_items(&tx, id, items)?;
        tx.execute(
            "UPDATE stores SET updated_at = datetime('now') WHERE id = ?1",
            [id],
        )?;
        tx.commit()?;

        Self::get_by_id(conn, id)
    }

    /// Delete a store; its items go with it via CASCADE
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM stores WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM stores", [], |row| row.get(0))?)
    }

    /// Every store, in insertion order, as plain directory entries
    pub fn load_all(conn: &Connection) -> DbResult<Vec<Store>> {
        let mut stmt = conn.prepare("SELECT * FROM stores ORDER BY rowid")?;
        let rows = stmt
            .query_map([], StoreRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items_stmt =
            conn.prepare("SELECT store_id, name FROM store_items ORDER BY id")?;
        let mut items_by_store: HashMap<String, Vec<String>> = HashMap::new();
        let item_rows = items_stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for item in item_rows {
            let (store_id, name) = item?;
            items_by_store.entry(store_id).or_default().push(name);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_store.remove(&row.id).unwrap_or_default();
                row.into_record(items).store
            })
            .collect())
    }
}

fn insert_items(conn: &Connection, store_id: &str, items: &[String]) -> DbResult<()> {
    let mut stmt = conn.prepare("INSERT INTO store_items (store_id, name) VALUES (?1, ?2)")?;
    for item in items {
        let name = item.trim();
        if !name.is_empty() {
            stmt.execute(params![store_id, name])?;
        }
    }
    Ok(())
}

fn list_items(conn: &Connection, store_id: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM store_items WHERE store_id = ?1 ORDER BY id")?;
    let items = stmt
        .query_map([store_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(items)
}

/// Store directory backed by the local database
pub struct SqliteStoreDirectory<'a> {
    database: &'a Database,
}

impl<'a> SqliteStoreDirectory<'a> {
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }
}

impl StoreDirectory for SqliteStoreDirectory<'_> {
    fn load_stores(&self) -> Result<Vec<Store>, StoreError> {
        self.database
            .with_conn(StoreRecord::load_all)
            .map_err(|e| StoreError::DataUnavailable(e.to_string()))
    }
}
