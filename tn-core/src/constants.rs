//! Application-wide constants.

/// Application name, also the name of the per-user data directory.
pub const APP_NAME: &str = "Tinode";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the local cache database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "database.sqlite";

/// Local database schema version, stored in `PRAGMA user_version`.
/// Increase on any table change: a mismatch wipes and recreates the cache.
pub const SCHEMA_VERSION: i32 = 100;

/// Default SQLite busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
