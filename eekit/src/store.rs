//! SQLite-backed key-value store.
//!
//! Values are JSON text under string keys. One connection is shared behind a
//! mutex so the store can be handed to async tasks.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, Result as SqlResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Keys used by the application state.
pub mod keys {
    pub const USER_ACCOUNT: &str = "user_account";
    pub const USER_FAVORITES: &str = "user_favorites";
    pub const COMP_FAVORITES: &str = "comp_favorites";
    pub const AI_HISTORY: &str = "ai_history";
    pub const SEARCH_HISTORY: &str = "search_history";
    pub const WATCHLIST: &str = "eelib_watchlist";
    pub const SETTINGS: &str = "settings";
}

pub struct KvStore {
    conn: Mutex<Connection>,
}

impl KvStore {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = KvStore {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        tracing::debug!("Opened store at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = KvStore {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.initialize()?;
        Ok(store)
    }

    fn get_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?")?;
        let result = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(result)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)",
            params![key, value],
        )?;
        tracing::debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Remove `key`. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.get_conn()?;
        let n = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(keys)
    }

    /// Read and decode a JSON value. A present but undecodable value is an error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::Serialization(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", key, e)))?;
        self.set(key, &text)
    }
}

trait OptionalResult<T> {
    fn optional(self) -> SqlResult<Option<T>>;
}

impl<T> OptionalResult<T> for SqlResult<T> {
    fn optional(self) -> SqlResult<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (KvStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");
        let store = KvStore::open(&path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_get_set() {
        let (store, _temp) = create_test_store();
        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v1".to_string()));
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_remove_and_keys() {
        let store = KvStore::open_in_memory().unwrap();
        store.set("b", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_json_roundtrip() {
        let store = KvStore::open_in_memory().unwrap();
        store
            .set_json(keys::SEARCH_HISTORY, &vec!["LDO 3.3V", "buck"])
            .unwrap();
        let history: Vec<String> = store.get_json(keys::SEARCH_HISTORY).unwrap().unwrap();
        assert_eq!(history, vec!["LDO 3.3V", "buck"]);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let store = KvStore::open_in_memory().unwrap();
        store.set(keys::WATCHLIST, "{not json").unwrap();
        let result: Result<Option<Vec<String>>> = store.get_json(keys::WATCHLIST);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.db");
        {
            let store = KvStore::open(&path).unwrap();
            store.set("persist", "yes").unwrap();
        }
        let store = KvStore::open(&path).unwrap();
        assert_eq!(store.get("persist").unwrap(), Some("yes".to_string()));
    }
}
