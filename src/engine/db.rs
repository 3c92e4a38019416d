//! SQLite store: schema, connections, and the engine's lookup traits.

use super::error;
use super::history::EntryHistory;
use super::repo::{EntryRepo, EquipmentRepo};
use super::snapshot::EquipmentSource;
use super::types::{Entry, EquipmentSnapshot};
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a store on disk.
///
/// Holds only the path; every lookup opens its own connection so that
/// lookups can run on separate threads.
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
}

impl Db {
    /// Creates the parent directory and schema if missing.
    ///
    /// # Errors
    /// Returns error if directory creation, DB opening, or migration fails.
    pub fn init(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }

        let db = Self {
            path: path.to_path_buf(),
        };
        let conn = db.connect().context("Failed to open database")?;
        Self::migrate(&conn)?;
        info!(path = %path.display(), "Initialized store");

        Ok(db)
    }

    /// Opens an existing store.
    ///
    /// # Errors
    /// Returns error if the database file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "No store at {}. Run `maintrack init` first.",
                path.display()
            );
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection with foreign keys enforced.
    ///
    /// The `EntryHistory` and `EquipmentSource` impls call this once per
    /// lookup, so evaluating a task opens two connections (one on a scoped
    /// thread). Fine for a CLI over a handful of tasks; a long-running
    /// embedder should hold a pool or use `MemoryStore`.
    ///
    /// # Errors
    /// Returns a `rusqlite` error if the file cannot be opened.
    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Applies the schema migrations.
    fn migrate(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS equipment (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                usage_hours REAL NOT NULL DEFAULT 0,
                commissioned_at TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("Failed to create equipment table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                equipment_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                usage_hours_interval INTEGER NOT NULL,
                calendar_months_interval INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY(equipment_id) REFERENCES equipment(id)
            )",
            [],
        )
        .context("Failed to create tasks table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY,
                equipment_id INTEGER NOT NULL,
                task_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                performed_at TEXT NOT NULL,
                usage_hours INTEGER NOT NULL,
                remarks TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(equipment_id) REFERENCES equipment(id),
                FOREIGN KEY(task_id) REFERENCES tasks(id)
            )",
            [],
        )
        .context("Failed to create entries table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entries_task ON entries (equipment_id, task_id)",
            [],
        )
        .context("Failed to create entries index")?;

        Ok(())
    }
}

impl EntryHistory for Db {
    fn find(&self, equipment_id: i64, task_id: i64) -> error::Result<Vec<Entry>> {
        let conn = self.connect()?;
        let entries = EntryRepo::new(&conn).find(equipment_id, task_id)?;
        debug!(equipment_id, task_id, count = entries.len(), "Loaded entry history");
        Ok(entries)
    }
}

impl EquipmentSource for Db {
    fn get_by_id(&self, equipment_id: i64) -> error::Result<Option<EquipmentSnapshot>> {
        let conn = self.connect()?;
        let snapshot = EquipmentRepo::new(&conn)
            .find_by_id(equipment_id)?
            .map(|e| e.snapshot());
        debug!(equipment_id, found = snapshot.is_some(), "Loaded equipment snapshot");
        Ok(snapshot)
    }
}
