//! Snapshot store contracts and implementations.
//!
//! # Responsibility
//! - Persist one serialized checklist snapshot per string key.
//! - Keep storage details out of the checklist service.
//!
//! # Invariants
//! - `save` replaces any previous value for the same key.
//! - `load` returns `Ok(None)` for a key that was never saved.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot persistence failure.
#[derive(Debug)]
pub enum SnapshotError {
    Db(DbError),
    Unavailable(String),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "snapshot store unavailable: {message}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SnapshotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SnapshotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value store holding serialized checklist snapshots.
pub trait SnapshotStore {
    fn load(&self, key: &str) -> SnapshotResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> SnapshotResult<()>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn load(&self, key: &str) -> SnapshotResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> SnapshotResult<()> {
        (**self).save(key, value)
    }
}

/// Process-local store, for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one snapshot.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.into(), value.into());
        store
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> SnapshotResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> SnapshotResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// SQLite-backed store over the `kv_store` table.
///
/// Expects a connection opened through `db::open_db*` so the table exists.
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self, key: &str) -> SnapshotResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> SnapshotResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySnapshotStore, SnapshotStore};

    #[test]
    fn memory_store_overwrites_per_key() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.load("k").unwrap(), None);

        store.save("k", "[]").unwrap();
        store.save("k", "[1]").unwrap();
        store.save("other", "x").unwrap();

        assert_eq!(store.load("k").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.load("other").unwrap().as_deref(), Some("x"));
    }
}
