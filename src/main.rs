// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Args, is_config_command};
use f1_lap_collector::config::Config;
use f1_lap_collector::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Configuration commands run before logging so they never need a valid config
    if args.list_config {
        return commands::handle_list_config_command().await;
    }

    if is_config_command(&args) {
        return commands::handle_config_update_command(&args).await;
    }

    // Load config first to fail early if there's an issue
    let config = Config::load().await?;

    let (log_file_path, _guard) = logging::setup_logging(&args, Some(&config)).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if args.clear_cache {
        return commands::handle_clear_cache_command(&args, config).await;
    }

    let result = commands::handle_collect_command(&args, config).await;
    if let Err(e) = &result {
        tracing::error!("Collection failed: {e}");
    }
    result
}
