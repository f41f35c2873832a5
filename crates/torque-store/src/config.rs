//! Store configuration loaded from environment variables.
//!
//! Every setting has a default so the store opens with zero configuration
//! for local development.

use std::path::PathBuf;

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file.
    /// Env: `TORQUE_DB_PATH`
    /// Default: `None`, meaning `torque.db` in the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Whether to switch the database to write-ahead logging.
    /// Env: `TORQUE_DB_WAL` (true/false)
    /// Default: `true`
    pub wal: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            wal: true,
        }
    }
}

impl StoreConfig {
    /// Load configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("TORQUE_DB_PATH") {
            if path.trim().is_empty() {
                tracing::warn!("Empty TORQUE_DB_PATH, using default location");
            } else {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(val) = lookup("TORQUE_DB_WAL") {
            match parse_bool(&val) {
                Some(wal) => config.wal = wal,
                None => {
                    tracing::warn!(value = %val, "Invalid TORQUE_DB_WAL, using default");
                }
            }
        }

        config
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
