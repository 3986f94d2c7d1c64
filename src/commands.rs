use crate::cli::{Args, is_season_mode};
use f1_lap_collector::SessionKind;
use f1_lap_collector::config::Config;
use f1_lap_collector::constants::output::SEASON_FILE_TEMPLATE;
use f1_lap_collector::data_fetcher::{OpenF1Provider, ResponseCache};
use f1_lap_collector::dataset::{
    CollectionReport, WriteMode, WriteOutcome, collect_season_data, fetch_one, save_to_csv,
};
use f1_lap_collector::error::AppError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Validates command line argument combinations for a collection run.
pub fn validate_args(args: &Args) -> Result<(i32, Vec<String>), AppError> {
    let year = args
        .year
        .ok_or_else(|| AppError::config_error("A season year is required (-y/--year)"))?;

    let events: Vec<String> = args
        .events
        .iter()
        .map(|event| event.trim().to_string())
        .filter(|event| !event.is_empty())
        .collect();
    if events.is_empty() {
        return Err(AppError::config_error(
            "At least one event is required (-e/--event)",
        ));
    }

    Ok((year, events))
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles the --clear-cache command for the configured (or --cache-dir) cache.
pub async fn handle_clear_cache_command(args: &Args, mut config: Config) -> Result<(), AppError> {
    if let Some(cache_dir) = &args.cache_dir {
        config.cache_dir = Some(cache_dir.clone());
    }
    let cache = ResponseCache::new(config.cache_dir());
    cache.clear().await?;
    println!("Cache cleared: {}", cache.dir().display());
    Ok(())
}

/// Handles configuration update commands (--set-api-domain, --set-cache-dir,
/// --set-data-dir, --set-log-file, --clear-log-file).
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();
    apply_config_updates(&mut config, args);
    config.validate()?;

    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

fn apply_config_updates(config: &mut Config, args: &Args) {
    if let Some(new_domain) = &args.new_api_domain {
        config.api_domain = new_domain.clone();
    }

    if let Some(new_cache_dir) = &args.new_cache_dir {
        config.cache_dir = Some(new_cache_dir.clone());
    }

    if let Some(new_data_dir) = &args.new_data_dir {
        config.data_dir = new_data_dir.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }
}

/// Runs a single session download or a season collection depending on the
/// arguments, and prints a summary.
pub async fn handle_collect_command(args: &Args, mut config: Config) -> Result<(), AppError> {
    let (year, events) = validate_args(args)?;

    if let Some(cache_dir) = &args.cache_dir {
        config.cache_dir = Some(cache_dir.clone());
    }
    let provider = OpenF1Provider::from_config(&config)?;
    let mode = write_mode(args);

    if is_season_mode(args) {
        if let Some(kind) = ignored_session_kind(args) {
            warn!("Season collection always uses the race, ignoring --session {kind}");
        }
        let file_name = args
            .output
            .clone()
            .unwrap_or_else(|| default_season_file_name(year));
        let output = prepare_output_path(&config, &file_name).await?;

        let report = collect_season_data(&provider, year, &events, &output, mode).await?;
        print_season_summary(&report);
    } else {
        let event = &events[0];
        let file_name = args
            .output
            .clone()
            .unwrap_or_else(|| default_session_file_name(event, year));
        let output = prepare_output_path(&config, &file_name).await?;

        let dataset = fetch_one(&provider, year, event, args.session).await?;
        let outcome = save_to_csv(&dataset, &output, mode).await?;
        print_session_summary(year, event, &outcome);
    }

    Ok(())
}

/// Session kind given on the command line that season collection will not use
fn ignored_session_kind(args: &Args) -> Option<SessionKind> {
    (is_season_mode(args) && args.session != SessionKind::Race).then_some(args.session)
}

fn write_mode(args: &Args) -> WriteMode {
    if args.append {
        WriteMode::Append
    } else {
        WriteMode::Overwrite
    }
}

/// `monaco_2024.csv` style name for a single session
pub fn default_session_file_name(event: &str, year: i32) -> String {
    let slug: String = event
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{slug}_{year}.csv")
}

pub fn default_season_file_name(year: i32) -> String {
    SEASON_FILE_TEMPLATE.replace("{year}", &year.to_string())
}

/// Resolves the output path and makes sure the configured data directory
/// exists. Other missing directories are left to fail at write time.
async fn prepare_output_path(config: &Config, file_name: &str) -> Result<PathBuf, AppError> {
    let output = config.resolve_output_path(Path::new(file_name));
    if !Path::new(file_name).is_absolute() && !Path::new(&config.data_dir).exists() {
        info!("Creating data directory {}", config.data_dir);
        tokio::fs::create_dir_all(&config.data_dir).await?;
    }
    Ok(output)
}

fn print_session_summary(year: i32, event: &str, outcome: &WriteOutcome) {
    println!(
        "{} {}: {} laps saved to {}",
        year,
        event,
        outcome.rows_written,
        outcome.path.display()
    );
}

fn print_season_summary(report: &CollectionReport) {
    println!("\nSeason {} collection", report.season);
    println!("────────────────────────────────────");
    println!("Succeeded ({}):", report.succeeded.len());
    for event in &report.succeeded {
        println!("  {event}");
    }
    if !report.failures.is_empty() {
        println!("Failed ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.event, failure.error);
        }
    }
    println!("────────────────────────────────────");
    match &report.written {
        Some(outcome) => println!(
            "{} laps saved to {}",
            outcome.rows_written,
            outcome.path.display()
        ),
        None => println!("No data collected, nothing written"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("f1_lap_collector").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(default_session_file_name("Monaco", 2024), "monaco_2024.csv");
        assert_eq!(
            default_session_file_name("Saudi Arabia", 2024),
            "saudi_arabia_2024.csv"
        );
        assert_eq!(default_season_file_name(2024), "f1_2024_data.csv");
    }

    #[test]
    fn test_validate_args_requires_year_and_event() {
        assert!(validate_args(&parse(&["-e", "Monaco"])).is_err());
        assert!(validate_args(&parse(&["-y", "2024"])).is_err());
        assert!(validate_args(&parse(&["-y", "2024", "-e", " "])).is_err());

        let (year, events) = validate_args(&parse(&["-y", "2024", "-e", "Bahrain, Monaco"])).unwrap();
        assert_eq!(year, 2024);
        assert_eq!(events, vec!["Bahrain", "Monaco"]);
    }

    #[test]
    fn test_write_mode_follows_append_flag() {
        assert_eq!(write_mode(&parse(&["--append"])), WriteMode::Append);
        assert_eq!(write_mode(&parse(&[])), WriteMode::Overwrite);
    }

    #[test]
    fn test_season_mode_reports_ignored_session_kind() {
        assert_eq!(
            ignored_session_kind(&parse(&["-e", "Bahrain,Monaco", "-s", "Q"])),
            Some(SessionKind::Qualifying)
        );
        assert_eq!(ignored_session_kind(&parse(&["-e", "Bahrain,Monaco"])), None);
        assert_eq!(ignored_session_kind(&parse(&["-e", "Monaco", "-s", "Q"])), None);
    }

    #[test]
    fn test_config_updates_are_applied() {
        let mut config = Config {
            log_file_path: Some("/tmp/old.log".to_string()),
            ..Config::default()
        };
        apply_config_updates(
            &mut config,
            &parse(&[
                "--set-api-domain",
                "http://localhost:8000",
                "--set-data-dir",
                "/srv/f1",
                "--set-cache-dir",
                "/var/cache/f1",
                "--clear-log-file",
            ]),
        );

        assert_eq!(config.api_domain, "http://localhost:8000");
        assert_eq!(config.data_dir, "/srv/f1");
        assert_eq!(config.cache_dir.as_deref(), Some("/var/cache/f1"));
        assert_eq!(config.log_file_path, None);
    }

    #[tokio::test]
    async fn test_prepare_output_path_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let config = Config {
            data_dir: data_dir.to_string_lossy().to_string(),
            ..Config::default()
        };

        let output = prepare_output_path(&config, "monaco_2024.csv").await.unwrap();

        assert!(data_dir.is_dir());
        assert_eq!(output, data_dir.join("monaco_2024.csv"));
    }
}
