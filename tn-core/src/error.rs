//! Global error types for the local store.
//!
//! All error categories are unified into a single `TnError` enum with
//! conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using TnError.
pub type TnResult<T> = Result<T, TnError>;

/// Unified error type covering all error categories of the local store.
#[derive(Error, Debug)]
pub enum TnError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- Database errors --
    /// The database file could not be opened or created. There is no
    /// fallback storage, so callers treat this as fatal.
    #[error("failed to open database: {0}")]
    Open(String),

    /// SQLite error during a store operation.
    #[error("database error: {0}")]
    Database(String),

    /// Database integrity check failed.
    #[error("database integrity check failed: {0}")]
    IntegrityCheck(String),

    /// The account sub-store could not complete an activation change.
    #[error("account error: {0}")]
    Account(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TnError {
    fn from(e: serde_json::Error) -> Self {
        TnError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for TnError {
    fn from(e: toml::de::Error) -> Self {
        TnError::Config(e.to_string())
    }
}
