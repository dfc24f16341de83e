//! Persistent key/value storage backing the cache
//!
//! The cache layer only needs a synchronous string store with get/set/remove
//! (the browser local-storage contract). [`SqliteStore`] provides it on disk;
//! any call may fail, e.g. when a write would exceed the store's capacity.

use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

/// Default capacity, matching the usual browser local-storage budget
pub const DEFAULT_CAPACITY_BYTES: usize = 5 * 1024 * 1024;

type Result<T> = std::result::Result<T, CacheError>;

/// Synchronous string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a raw value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a raw value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// SQLite-backed key/value store
pub struct SqliteStore {
    conn: Mutex<Connection>,
    capacity_bytes: usize,
}

impl SqliteStore {
    /// Open or create storage at the default XDG cache location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Get the cache directory path (~/.cache/butteryop on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("butteryop"))
    }

    /// Open storage in a specific directory (for testing)
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            Self::nuke(&db_path)?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
        })
    }

    /// Override the total capacity in bytes
    pub fn with_capacity(mut self, capacity_bytes: usize) -> Self {
        self.capacity_bytes = capacity_bytes;
        self
    }

    /// Total bytes of stored keys and values
    pub fn size_bytes(&self) -> Result<usize> {
        let conn = self.lock()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM kv_entries",
            [],
            |r| r.get(0),
        )?;
        Ok(total as usize)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Io("cache connection lock poisoned".to_string()))
    }

    /// Delete the database file
    fn nuke(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            std::fs::remove_file(db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        let size = key.len() + value.len();

        let others: i64 = conn.query_row(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM kv_entries WHERE key != ?1",
            params![key],
            |r| r.get(0),
        )?;
        let projected = others as usize + size;
        if projected > self.capacity_bytes {
            return Err(CacheError::QuotaExceeded {
                size: projected,
                limit: self.capacity_bytes,
            });
        }

        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value, updated_at, size_bytes)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, value, Utc::now().timestamp(), size as i64],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_entries ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = SqliteStore::open_at(dir.path()).unwrap();
        (storage, dir)
    }

    #[test]
    fn test_set_get() {
        let (storage, _dir) = test_storage();

        storage.set("key1", "small data").unwrap();

        assert_eq!(storage.get("key1").unwrap().as_deref(), Some("small data"));
        assert_eq!(storage.get("missing").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let (storage, _dir) = test_storage();

        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();

        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(storage.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let (storage, _dir) = test_storage();

        storage.set("k1", "d1").unwrap();
        storage.remove("k1").unwrap();
        storage.remove("k1").unwrap();

        assert!(storage.get("k1").unwrap().is_none());
    }

    #[test]
    fn test_quota_exceeded() {
        let (storage, _dir) = test_storage();
        let storage = storage.with_capacity(16);

        storage.set("a", "12345").unwrap();
        let err = storage.set("b", "0123456789abcdef").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { .. }));

        // The failed write leaves existing data alone
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("12345"));
        assert!(storage.get("b").unwrap().is_none());
    }

    #[test]
    fn test_overwrite_does_not_count_old_value() {
        let (storage, _dir) = test_storage();
        let storage = storage.with_capacity(12);

        storage.set("a", "1234567890").unwrap();
        storage.set("a", "0987654321").unwrap();
        assert_eq!(storage.size_bytes().unwrap(), 11);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let storage = SqliteStore::open_at(dir.path()).unwrap();
            storage.set("k", "v").unwrap();
        }
        let storage = SqliteStore::open_at(dir.path()).unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
