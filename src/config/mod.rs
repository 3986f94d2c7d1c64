use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_default_cache_dir, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Provider API base URL. Should include the scheme.
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    /// Response cache directory. Defaults to the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Directory relative output file names are resolved against
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

fn default_api_domain() -> String {
    constants::DEFAULT_API_DOMAIN.to_string()
}

fn default_data_dir() -> String {
    constants::DEFAULT_DATA_DIR.to_string()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: default_api_domain(),
            cache_dir: None,
            data_dir: default_data_dir(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing config file means defaults. Environment variables
    /// override file values.
    ///
    /// # Environment Variables
    /// - `F1_API_DOMAIN` - Override API domain
    /// - `F1_CACHE_DIR` - Override cache directory
    /// - `F1_DATA_DIR` - Override output data directory
    /// - `F1_LOG_FILE` - Override log file path
    /// - `F1_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    pub async fn load() -> Result<Self, AppError> {
        Self::load_or_default(&get_config_path()).await
    }

    /// Loads `path` if it exists (defaults otherwise), applies environment
    /// overrides and validates the result.
    pub async fn load_or_default(path: &str) -> Result<Self, AppError> {
        let mut config = if Path::new(path).exists() {
            Self::load_from_path(path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `F1_*` environment variable overrides in place. Unparsable
    /// timeouts are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = api_domain;
        }

        if let Ok(cache_dir) = std::env::var(env_vars::CACHE_DIR) {
            self.cache_dir = Some(cache_dir);
        }

        if let Ok(data_dir) = std::env::var(env_vars::DATA_DIR) {
            self.data_dir = data_dir;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Response cache directory: the configured one or the platform default
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(get_default_cache_dir)
    }

    /// Resolves an output file name. Absolute paths are kept, relative ones
    /// land in `data_dir`.
    pub fn resolve_output_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            Path::new(&self.data_dir).join(file)
        }
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and effective settings
    /// - Notes when no config file exists and defaults are in use
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !Path::new(&config_path).exists() {
            println!("(Not created yet, showing defaults)");
        }
        println!("────────────────────────────────────");
        println!("API Domain:");
        println!("{}", config.api_domain);
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Cache Directory:");
        println!("{}", config.cache_dir().display());
        if config.cache_dir.is_none() {
            println!("(Default location)");
        }
        println!("────────────────────────────────────");
        println!("Data Directory:");
        println!("{}", config.data_dir);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{}", constants::LOG_FILE_NAME);
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist. An API domain
    /// without a scheme is stored with `https://`.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let api_domain = if self.api_domain.starts_with("https://")
            || self.api_domain.starts_with("http://")
        {
            self.api_domain.clone()
        } else {
            format!("https://{}", self.api_domain)
        };
        let content = toml::to_string_pretty(&Config {
            api_domain,
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without environment
    /// overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
