//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist JSON values under string keys in the `kv_entries` table.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - Values are stored as JSON text and must parse back on read.
//! - `set` writes all entries in one transaction.

use crate::db::{open_db, open_db_in_memory};
use crate::store::{KvSnapshot, KvStore, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key-value store over one migrated SQLite connection.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (and migrates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, keys: &[&str]) -> StoreResult<KvSnapshot> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM kv_entries WHERE key = ?1;")?;
        let mut snapshot = KvSnapshot::new();

        for key in keys {
            let raw: Option<String> = stmt
                .query_row([key], |row| row.get(0))
                .optional()?;
            if let Some(raw) = raw {
                let value = serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
                    key: key.to_string(),
                    source,
                })?;
                snapshot.insert(key.to_string(), value);
            }
        }

        Ok(snapshot)
    }

    fn set(&self, entries: KvSnapshot) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
            )?;
            for (key, value) in &entries {
                let encoded = serde_json::to_string(value).map_err(StoreError::Encode)?;
                stmt.execute(params![key, encoded])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
