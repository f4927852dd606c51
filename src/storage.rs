//! Key-value substrate for murmur: SQLite on disk, or a plain map in memory.

use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage directory name.
pub const MURMUR_DIR: &str = ".murmur";

/// SQLite database file.
pub const DB_FILE: &str = "murmur.db";

/// A store of JSON documents addressed by key.
///
/// `put` fully replaces whatever was stored under the key before.
pub trait Backend {
    /// Read the raw JSON stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed key-value table.
pub struct SqliteBackend {
    db: Connection,
}

impl SqliteBackend {
    /// Create the storage directory and database under `root`.
    pub fn init(root: &Path) -> Result<Self> {
        let murmur_dir = root.join(MURMUR_DIR);
        fs::create_dir_all(&murmur_dir).context("Failed to create .murmur directory")?;
        Self::connect(murmur_dir.join(DB_FILE))
    }

    /// Open the database of an initialized store directory.
    ///
    /// The caller checks that the directory exists.
    pub fn open(root: &Path) -> Result<Self> {
        Self::connect(root.join(MURMUR_DIR).join(DB_FILE))
    }

    fn connect(path: PathBuf) -> Result<Self> {
        let db = Connection::open(&path)
            .with_context(|| format!("Failed to open SQLite database at {}", path.display()))?;
        let backend = Self { db };
        backend.init_schema()?;
        Ok(backend)
    }

    /// Initialize SQLite schema.
    fn init_schema(&self) -> Result<()> {
        self.db
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
            "#,
            )
            .context("Failed to initialize schema")?;

        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read key '{}'", key))?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, ?)",
                params![key, value, chrono::Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write key '{}'", key))?;
        Ok(())
    }
}

/// Volatile backend for tests and scratch sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
