//! Unified error type for data layer

use thiserror::Error;

/// Unified error type for data layer operations
///
/// Wraps backend-specific errors while preserving context about which
/// backend generated the error.
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Stored document could not be decoded
    #[error("Corrupt record in {table}: {error}")]
    CorruptRecord { table: &'static str, error: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DataError {
    pub fn corrupt_record(table: &'static str, error: impl ToString) -> Self {
        Self::CorruptRecord {
            table,
            error: error.to_string(),
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::MigrationFailed { backend, .. } => backend,
            Self::CorruptRecord { .. } => "sqlite",
            Self::Config(_) | Self::Io(_) | Self::Conflict(_) => "unknown",
        }
    }
}

/// Convert from the backend-specific SqliteError type
impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        match e {
            crate::data::sqlite::SqliteError::Database(e) => Self::Sqlite(e),
            crate::data::sqlite::SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "sqlite",
                version,
                name,
                error,
            },
            crate::data::sqlite::SqliteError::CorruptRecord { table, error } => {
                Self::CorruptRecord { table, error }
            }
            crate::data::sqlite::SqliteError::Io(e) => Self::Io(e),
            crate::data::sqlite::SqliteError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}
