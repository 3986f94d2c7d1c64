use crate::cli::Args;
use f1_lap_collector::config::Config;
use f1_lap_collector::constants::{APP_DIR_NAME, LOG_FILE_NAME};
use f1_lap_collector::error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sets up logging configuration for the application.
///
/// - Logs go to both stdout and a daily rolling file
/// - `--quiet` logs only to the file
/// - `--debug` raises the crate's level to debug
/// - `RUST_LOG` directives still apply on top
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(
    args: &Args,
    config: Option<&Config>,
) -> Result<(String, WorkerGuard), AppError> {
    let config_log_path = config.and_then(|config| config.log_file_path.clone());

    let custom_log_path = args.log_file.as_ref().or(config_log_path.as_ref());
    let (log_dir, log_file_name) = match custom_log_path {
        Some(custom_path) => split_log_path(custom_path),
        None => (Config::get_log_dir_path(), LOG_FILE_NAME.to_string()),
    };

    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    // New log file each day
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must outlive the subscriber or buffered lines are lost
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let directive = default_directive(args.debug);
    let registry = tracing_subscriber::registry();

    if args.quiet {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_filter(build_filter(&directive)?),
            )
            .init();
    } else {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(stdout)
                    .with_ansi(true)
                    .with_filter(build_filter(&directive)?),
            )
            .with(
                fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_filter(build_filter(&directive)?),
            )
            .init();
    }

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}

fn default_directive(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("{APP_DIR_NAME}={level}")
}

fn build_filter(directive: &str) -> Result<EnvFilter, AppError> {
    let directive: Directive = directive
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Splits a log file path into directory and file name, defaulting the
/// name when the path has none.
fn split_log_path(custom_path: &str) -> (String, String) {
    let path = Path::new(custom_path);
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(LOG_FILE_NAME);
    (parent.to_string_lossy().to_string(), file_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(false), "f1_lap_collector=info");
        assert_eq!(default_directive(true), "f1_lap_collector=debug");
        assert!(build_filter(&default_directive(true)).is_ok());
    }

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path("/var/log/f1/run.log"),
            ("/var/log/f1".to_string(), "run.log".to_string())
        );
        assert_eq!(
            split_log_path("run.log"),
            (".".to_string(), "run.log".to_string())
        );
    }
}
