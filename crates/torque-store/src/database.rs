//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
///
/// The database is the only place ids, timestamps and the `users.email`
/// uniqueness rule are decided. Open one handle per thread; SQLite
/// serializes the writes.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database described by `config`.
    ///
    /// Without an explicit path the file is placed in the platform data
    /// directory:
    /// - Linux:   `~/.local/share/torque/torque.db`
    /// - macOS:   `~/Library/Application Support/com.torque.torque/torque.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\torque\torque\data\torque.db`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db_path = match &config.db_path {
            Some(path) => path.clone(),
            None => default_db_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %db_path.display(), wal = config.wal, "opening database");

        let conn = Connection::open(&db_path)?;
        if config.wal {
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }
        Self::init(conn)
    }

    /// Open (or create) a database at an explicit path with default settings.
    pub fn open_at(path: &Path) -> Result<Self> {
        Self::open(&StoreConfig {
            db_path: Some(path.to_path_buf()),
            ..StoreConfig::default()
        })
    }

    /// Open a private in-memory database. Everything is lost on drop.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "torque", "torque").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().join("torque.db"))
}
