//! OS-specific application directories.

use std::path::PathBuf;
use crate::constants::APP_NAME;
use crate::error::{TnError, TnResult};

/// Application-private data directory. The local cache database lives here.
///
/// - Windows: `%APPDATA%/Tinode`
/// - macOS: `~/Library/Application Support/Tinode`
/// - Linux: `~/.local/share/Tinode`
pub fn data_dir() -> TnResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| TnError::Config("could not determine data directory".into()))?;
    Ok(base.join(APP_NAME))
}

/// Configuration directory.
///
/// - Windows: `%APPDATA%/Tinode`
/// - macOS: `~/Library/Application Support/Tinode`
/// - Linux: `~/.config/Tinode`
pub fn config_dir() -> TnResult<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| TnError::Config("could not determine config directory".into()))?;
    Ok(base.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_is_app_scoped() {
        if let Ok(dir) = data_dir() {
            assert!(dir.ends_with(APP_NAME));
            assert!(dir.is_absolute());
        }
    }

    #[test]
    fn test_config_dir_is_app_scoped() {
        if let Ok(dir) = config_dir() {
            assert!(dir.ends_with(APP_NAME));
            assert!(dir.is_absolute());
        }
    }
}
