use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Logical keys, one per persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Jobs,
    Applications,
    Credentials,
    Profile,
    ActiveTab,
    CurrentRole,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::Jobs,
        StorageKey::Applications,
        StorageKey::Credentials,
        StorageKey::Profile,
        StorageKey::ActiveTab,
        StorageKey::CurrentRole,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Jobs => "jobs",
            StorageKey::Applications => "applications",
            StorageKey::Credentials => "credentials",
            StorageKey::Profile => "profile",
            StorageKey::ActiveTab => "activeTab",
            StorageKey::CurrentRole => "currentRole",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A string-in, string-out key-value medium. Every operation may fail.
pub trait StorageMedium {
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Inserts or replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns `Ok(())` even if the key doesn't exist.
    fn remove(&self, key: &str) -> Result<()>;

    fn describe(&self) -> String;
}

pub struct SqliteMedium {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteMedium {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Unavailable(format!("{}: {}", parent.display(), e)))?;
        }
        let conn = Connection::open(path)?;
        let medium = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        medium.init()?;
        Ok(medium)
    }

    pub fn open_in_memory() -> Result<Self> {
        let medium = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        medium.init()?;
        Ok(medium)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }
}

impl StorageMedium for SqliteMedium {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM entries WHERE key = ?1",
            [key],
            |row| row.get(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM entries WHERE key = ?1", [key])?;
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}

/// Process-local medium. Nothing survives the process.
#[derive(Default)]
pub struct MemoryMedium {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// JSON mirror of session state over a [`StorageMedium`].
///
/// The `try_*` methods report every failure. `load`, `save` and `remove`
/// never do: a failed read yields the caller's fallback and a failed write is
/// dropped, both logged at `warn`. In-memory state stays authoritative either
/// way.
pub struct Cache {
    medium: Box<dyn StorageMedium>,
}

impl Cache {
    pub fn new(medium: Box<dyn StorageMedium>) -> Self {
        Self { medium }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryMedium::new()))
    }

    pub fn describe(&self) -> String {
        self.medium.describe()
    }

    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.medium.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    pub fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.medium.set(key, &raw)
    }

    pub fn try_remove(&self, key: &str) -> Result<()> {
        self.medium.remove(key)
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(key, "no stored value, using fallback");
                fallback
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "load failed, using fallback");
                fallback
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            tracing::warn!(key, error = %e, "save failed, keeping in-memory state only");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.try_remove(key) {
            tracing::warn!(key, error = %e, "remove failed");
        }
    }
}

/// Open the SQLite store at `path`, or fall back to an in-memory cache when
/// the file cannot be opened.
pub fn open_cache(path: &Path) -> Cache {
    match SqliteMedium::open(path) {
        Ok(medium) => Cache::new(Box::new(medium)),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "storage unavailable, changes will not outlive this process"
            );
            Cache::in_memory()
        }
    }
}
