//! CLI command implementations.

pub mod account;
pub mod db;

use std::sync::Arc;

use tn_core::config::AppConfig;
use tn_core::error::TnResult;
use tn_store::LocalStore;

/// Helper to open the local store from config.
pub fn open_store(config: &AppConfig) -> TnResult<Arc<LocalStore>> {
    let db_path = config.effective_db_path()?;
    LocalStore::open(&db_path, &config.database)
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
