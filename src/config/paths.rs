use std::path::{Path, PathBuf};

use crate::constants::APP_DIR_NAME;

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR_NAME)
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
///
/// Falls back to the current directory if the config directory is unavailable.
pub fn get_log_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR_NAME)
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Default response cache directory (e.g. ~/.cache/f1_lap_collector on Linux)
pub fn get_default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| Path::new(".").join("data"))
        .join(APP_DIR_NAME)
}
