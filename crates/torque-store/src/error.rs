use thiserror::Error;
use torque_shared::ValidationError;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// The payload was rejected before reaching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A `UNIQUE` column already holds the submitted value.
    #[error("{table}.{field} already exists")]
    UniquenessViolation {
        table: &'static str,
        field: &'static str,
    },

    /// Password hashing or hash parsing failed.
    #[error("Credential error: {0}")]
    Credential(String),
}

impl StoreError {
    /// True when the caller should report "already exists" rather than a
    /// generic failure.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::UniquenessViolation { .. })
    }

    /// Map a failed insert/update, turning a unique-constraint failure on
    /// `table.field` into [`StoreError::UniquenessViolation`].
    pub(crate) fn from_write(
        table: &'static str,
        field: &'static str,
    ) -> impl FnOnce(rusqlite::Error) -> StoreError {
        move |e| match e {
            rusqlite::Error::SqliteFailure(ref err, _)
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                tracing::warn!(table, field, "unique constraint rejected write");
                StoreError::UniquenessViolation { table, field }
            }
            other => StoreError::Sqlite(other),
        }
    }

    /// Map a single-row lookup, turning "no rows" into [`StoreError::NotFound`].
    pub(crate) fn from_lookup(e: rusqlite::Error) -> StoreError {
        match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            other => StoreError::Sqlite(other),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
