use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use f1_lap_collector::SessionKind;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Returns true when only configuration commands were requested
pub fn is_config_command(args: &Args) -> bool {
    args.new_api_domain.is_some()
        || args.new_cache_dir.is_some()
        || args.new_data_dir.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

/// Season collection runs for `--season` or whenever more than one event is given
pub fn is_season_mode(args: &Args) -> bool {
    args.season || args.events.len() > 1
}

/// F1 lap telemetry collector
///
/// Downloads per-lap timing data for Formula 1 sessions and stores it as CSV
/// for training and analysis.
///
/// Single session:   f1_lap_collector -y 2024 -e Monaco -s R
/// Season dataset:   f1_lap_collector -y 2024 -e Bahrain,"Saudi Arabia",Australia
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Season year, e.g. 2024
    #[arg(short = 'y', long = "year", help_heading = "Collection")]
    pub year: Option<i32>,

    /// Event (Grand Prix) name, e.g. Monaco. Repeat the flag or separate
    /// names with commas to collect several races.
    #[arg(
        short = 'e',
        long = "event",
        value_delimiter = ',',
        help_heading = "Collection"
    )]
    pub events: Vec<String>,

    /// Session to fetch: FP1, FP2, FP3, Q or R. Season collection always uses R.
    #[arg(
        short = 's',
        long = "session",
        default_value = "R",
        help_heading = "Collection"
    )]
    pub session: SessionKind,

    /// Output CSV file. Relative names are placed in the configured data
    /// directory. Defaults to {event}_{year}.csv or f1_{year}_data.csv.
    #[arg(short = 'o', long = "output", help_heading = "Collection")]
    pub output: Option<String>,

    /// Collect race data for all given events into one file, even for a single event
    #[arg(long = "season", help_heading = "Collection")]
    pub season: bool,

    /// Append rows to the output file instead of overwriting it.
    /// A missing or empty file is created with a header.
    #[arg(long = "append", help_heading = "Collection")]
    pub append: bool,

    /// Use this response cache directory for this run
    #[arg(long = "cache-dir", help_heading = "Collection")]
    pub cache_dir: Option<String>,

    /// Update the provider API domain in config
    #[arg(
        long = "set-api-domain",
        help_heading = "Configuration",
        value_name = "API_DOMAIN"
    )]
    pub new_api_domain: Option<String>,

    /// Update the response cache directory in config
    #[arg(long = "set-cache-dir", help_heading = "Configuration", value_name = "DIR")]
    pub new_cache_dir: Option<String>,

    /// Update the output data directory in config
    #[arg(long = "set-data-dir", help_heading = "Configuration", value_name = "DIR")]
    pub new_data_dir: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Delete all cached provider responses and exit
    #[arg(long = "clear-cache", help_heading = "Configuration")]
    pub clear_cache: bool,

    /// Enable debug level logging
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Only write logs to the log file, not to the terminal
    #[arg(short = 'q', long = "quiet", help_heading = "Debug")]
    pub quiet: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
