use crate::error::AppError;
use std::path::Path;

use super::Config;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API domain cannot be empty
/// - API domain must be a valid URL or domain name
/// - Data directory cannot be empty
/// - Cache directory, if set, cannot be empty
/// - If log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
/// - HTTP timeout must be positive
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let api_domain = config.api_domain.as_str();
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://") && !api_domain.starts_with("https://") {
        // Without a scheme it should at least look like a domain
        if !api_domain.contains('.') && !api_domain.starts_with("localhost") {
            return Err(AppError::config_error(
                "API domain must be a valid URL or domain name",
            ));
        }
    }

    if config.data_dir.trim().is_empty() {
        return Err(AppError::config_error("Data directory cannot be empty"));
    }

    if let Some(cache_dir) = &config.cache_dir
        && cache_dir.trim().is_empty()
    {
        return Err(AppError::config_error("Cache directory cannot be empty"));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least one second",
        ));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
