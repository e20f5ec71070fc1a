//! Application configuration management.
//!
//! Handles loading, saving, and accessing the local store configuration:
//! where the cache database lives, how connections are tuned, and how
//! logging is set up. Configuration is persisted as TOML on disk.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::constants::{DATABASE_FILE_NAME, DEFAULT_BUSY_TIMEOUT_MS};
use crate::error::{TnError, TnResult};
use crate::platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. If empty, uses the default location.
    #[serde(default)]
    pub path: String,

    /// Enable WAL (Write-Ahead Logging) mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// How long SQLite waits on a locked database before failing.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,

    /// Run `PRAGMA integrity_check` when the store is opened.
    #[serde(default)]
    pub integrity_check_on_startup: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses the default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_true() -> bool {
    true
}

fn default_busy_timeout() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            wal_mode: true,
            busy_timeout_ms: default_busy_timeout(),
            integrity_check_on_startup: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path, falling back
    /// to defaults when no file exists.
    pub fn load_default() -> TnResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> TnResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> TnResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TnError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> TnResult<PathBuf> {
        Ok(platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective database path, using the configured path or
    /// `<data dir>/database.sqlite`.
    pub fn effective_db_path(&self) -> TnResult<PathBuf> {
        self.database.effective_path()
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> TnResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }
}

impl DatabaseConfig {
    /// Resolve the database file path.
    ///
    /// A configured path naming a directory (trailing separator or an
    /// existing directory) gets the database file name appended.
    pub fn effective_path(&self) -> TnResult<PathBuf> {
        if self.path.is_empty() {
            return Ok(platform::data_dir()?.join(DATABASE_FILE_NAME));
        }
        let configured = PathBuf::from(&self.path);
        let names_dir = self.path.ends_with(std::path::MAIN_SEPARATOR)
            || self.path.ends_with('/')
            || configured.is_dir();
        if names_dir {
            Ok(configured.join(DATABASE_FILE_NAME))
        } else {
            Ok(configured)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.database.wal_mode);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert!(!config.database.integrity_check_on_startup);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_db_path_uses_fixed_file_name() {
        let config = AppConfig::default();
        if let Ok(path) = config.effective_db_path() {
            assert!(path.ends_with(DATABASE_FILE_NAME));
        }
    }

    #[test]
    fn test_directory_path_gets_file_name_appended() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().display().to_string(),
            ..DatabaseConfig::default()
        };
        assert_eq!(
            config.effective_path().unwrap(),
            dir.path().join(DATABASE_FILE_NAME)
        );

        let config = DatabaseConfig {
            path: "/var/lib/tinode/".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(config.effective_path().unwrap().ends_with(DATABASE_FILE_NAME));
    }

    #[test]
    fn test_explicit_file_path_is_kept() {
        let config = DatabaseConfig {
            path: "/tmp/custom.db".to_string(),
            ..DatabaseConfig::default()
        };
        assert_eq!(config.effective_path().unwrap(), PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("[database]\npath = \"/tmp/x.sqlite\"\n").unwrap();
        assert_eq!(config.database.path, "/tmp/x.sqlite");
        assert!(config.database.wal_mode);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.logging.level = "debug".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.database.busy_timeout_ms, config.database.busy_timeout_ms);
    }
}
