//! Season collection: fetch, project and tag each race, then persist the
//! combined dataset.

use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument, warn};

use super::csv_writer::{CsvRow, WriteMode, WriteOutcome, save_to_csv};
use super::projection::{LapDataset, LapRecord, project};
use crate::constants::output::{EVENT_COLUMN, SEASON_COLUMN};
use crate::data_fetcher::models::{SessionId, SessionKind};
use crate::data_fetcher::provider::SessionProvider;
use crate::error::AppError;

/// A projected lap tagged with the event it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonLapRecord {
    pub lap: LapRecord,
    /// Event name exactly as requested
    pub grand_prix: String,
    pub year: i32,
}

pub type SeasonDataset = Vec<SeasonLapRecord>;

impl CsvRow for SeasonLapRecord {
    fn header() -> Vec<&'static str> {
        let mut header = LapRecord::header();
        header.push(EVENT_COLUMN);
        header.push(SEASON_COLUMN);
        header
    }

    fn to_record(&self) -> Vec<String> {
        let mut record = self.lap.to_record();
        record.push(self.grand_prix.clone());
        record.push(self.year.to_string());
        record
    }
}

/// An event that could not be collected
#[derive(Debug)]
pub struct EventFailure {
    pub event: String,
    pub error: AppError,
}

/// Result of a season collection run.
#[derive(Debug)]
pub struct CollectionReport {
    pub season: i32,
    /// Combined rows; `None` when no event succeeded
    pub dataset: Option<SeasonDataset>,
    /// Events that produced data, in request order
    pub succeeded: Vec<String>,
    pub failures: Vec<EventFailure>,
    /// Set when the dataset was written
    pub written: Option<WriteOutcome>,
}

impl CollectionReport {
    pub fn total_rows(&self) -> usize {
        self.dataset.as_ref().map_or(0, Vec::len)
    }

    pub fn failed_events(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.event.as_str()).collect()
    }
}

/// Fetches one session and projects it. Any provider error, including
/// missing data, is returned to the caller.
#[instrument(skip(provider))]
pub async fn fetch_one<P: SessionProvider + ?Sized>(
    provider: &P,
    season: i32,
    event: &str,
    kind: SessionKind,
) -> Result<LapDataset, AppError> {
    let id = SessionId::new(season, event, kind);
    let session = provider.fetch_session(&id).await?;
    Ok(project(&session))
}

/// Collects race laps for every event in `events`, in order, and writes the
/// combined dataset to `output_file`.
///
/// Events that fail are logged and reported, never fatal. Nothing is written
/// when no event succeeds. A failed write is returned as an error.
#[instrument(skip(provider, events), fields(events = events.len()))]
pub async fn collect_season_data<P: SessionProvider + ?Sized>(
    provider: &P,
    season: i32,
    events: &[String],
    output_file: &Path,
    mode: WriteMode,
) -> Result<CollectionReport, AppError> {
    warn_on_duplicates(events);

    let mut dataset = SeasonDataset::new();
    let mut succeeded = Vec::new();
    let mut failures = Vec::new();

    for event in events {
        info!("Fetching data for {} {}", season, event);
        match fetch_one(provider, season, event, SessionKind::Race).await {
            Ok(laps) => {
                info!("Collected {} laps for {}", laps.len(), event);
                dataset.extend(laps.into_iter().map(|lap| SeasonLapRecord {
                    lap,
                    grand_prix: event.clone(),
                    year: season,
                }));
                succeeded.push(event.clone());
            }
            Err(error) => {
                warn!("Error fetching data for {}: {}", event, error);
                failures.push(EventFailure {
                    event: event.clone(),
                    error,
                });
            }
        }
    }

    if succeeded.is_empty() {
        warn!("No event produced data for season {}, nothing written", season);
        return Ok(CollectionReport {
            season,
            dataset: None,
            succeeded,
            failures,
            written: None,
        });
    }

    let written = save_to_csv(&dataset, output_file, mode).await?;
    info!(
        "Season {}: {} events collected, {} failed",
        season,
        succeeded.len(),
        failures.len()
    );

    Ok(CollectionReport {
        season,
        dataset: Some(dataset),
        succeeded,
        failures,
        written: Some(written),
    })
}

fn warn_on_duplicates(events: &[String]) {
    let mut seen = HashSet::new();
    for event in events {
        if !seen.insert(event.as_str()) {
            warn!("Event '{}' is listed more than once; its laps will repeat", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockProvider, TestDataBuilder};
    use tempfile::tempdir;

    fn events(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn two_race_provider() -> MockProvider {
        MockProvider::new()
            .with_race(
                2024,
                "Bahrain",
                vec![
                    TestDataBuilder::session_lap("VER", 1, 1, 97.2),
                    TestDataBuilder::session_lap("VER", 1, 2, 96.8),
                    TestDataBuilder::session_lap("LEC", 16, 1, 97.9),
                ],
            )
            .with_race(
                2024,
                "Monaco",
                vec![
                    TestDataBuilder::session_lap("LEC", 16, 1, 78.1),
                    TestDataBuilder::session_lap("PIA", 81, 1, 78.4),
                ],
            )
    }

    #[tokio::test]
    async fn test_fetch_one_projects_session() {
        let provider = two_race_provider();

        let dataset = fetch_one(&provider, 2024, "Monaco", SessionKind::Race)
            .await
            .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[1].driver, "PIA");
        assert_eq!(dataset[0].lap_time_seconds, Some(78.1));
    }

    #[tokio::test]
    async fn test_fetch_one_propagates_unavailable_data() {
        let provider = two_race_provider();

        let err = fetch_one(&provider, 2024, "Monaco", SessionKind::Qualifying)
            .await
            .unwrap_err();

        assert!(err.is_data_unavailable());
    }

    #[tokio::test]
    async fn test_events_are_combined_in_request_order() {
        let provider = two_race_provider();
        let dir = tempdir().unwrap();
        let output = dir.path().join("season.csv");

        let report = collect_season_data(
            &provider,
            2024,
            &events(&["Bahrain", "Monaco"]),
            &output,
            WriteMode::Overwrite,
        )
        .await
        .unwrap();

        let dataset = report.dataset.unwrap();
        let tags: Vec<&str> = dataset.iter().map(|r| r.grand_prix.as_str()).collect();
        assert_eq!(tags, vec!["Bahrain", "Bahrain", "Bahrain", "Monaco", "Monaco"]);
        assert!(dataset.iter().all(|r| r.year == 2024));
        assert_eq!(report.succeeded, events(&["Bahrain", "Monaco"]));
        assert!(report.failures.is_empty());
        assert_eq!(report.written.unwrap().rows_written, 5);
    }

    #[tokio::test]
    async fn test_failed_event_is_recorded_and_skipped() {
        let provider = two_race_provider();
        let dir = tempdir().unwrap();
        let output = dir.path().join("season.csv");

        let report = collect_season_data(
            &provider,
            2024,
            &events(&["Bahrain", "NoSuchGP"]),
            &output,
            WriteMode::Overwrite,
        )
        .await
        .unwrap();

        assert_eq!(report.total_rows(), 3);
        assert_eq!(report.failed_events(), vec!["NoSuchGP"]);
        assert!(report.failures[0].error.is_data_unavailable());

        let content = tokio::fs::read_to_string(&output).await.unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.lines().skip(1).all(|line| line.ends_with(",Bahrain,2024")));
    }

    #[tokio::test]
    async fn test_provider_errors_do_not_stop_collection() {
        let provider = two_race_provider().with_failing_race(2024, "Bahrain", "upstream down");
        let dir = tempdir().unwrap();
        let output = dir.path().join("season.csv");

        let report = collect_season_data(
            &provider,
            2024,
            &events(&["Bahrain", "Monaco"]),
            &output,
            WriteMode::Overwrite,
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded, events(&["Monaco"]));
        assert!(matches!(
            report.failures[0].error,
            AppError::ApiServerError { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_event_list_writes_nothing() {
        let provider = two_race_provider();
        let dir = tempdir().unwrap();
        let output = dir.path().join("season.csv");

        let report = collect_season_data(&provider, 2024, &[], &output, WriteMode::Overwrite)
            .await
            .unwrap();

        assert!(report.dataset.is_none());
        assert!(report.written.is_none());
        assert!(provider.requests().is_empty());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_all_events_failing_writes_nothing() {
        let provider = MockProvider::new();
        let dir = tempdir().unwrap();
        let output = dir.path().join("season.csv");

        let report = collect_season_data(
            &provider,
            2024,
            &events(&["Imola", "Monza"]),
            &output,
            WriteMode::Append,
        )
        .await
        .unwrap();

        assert!(report.dataset.is_none());
        assert_eq!(report.failures.len(), 2);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_collection_only_requests_races() {
        let provider = two_race_provider();
        let dir = tempdir().unwrap();

        collect_season_data(
            &provider,
            2024,
            &events(&["Monaco", "Bahrain"]),
            &dir.path().join("out.csv"),
            WriteMode::Overwrite,
        )
        .await
        .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|id| id.kind == SessionKind::Race));
        assert_eq!(requests[0].event, "Monaco");
    }

    #[tokio::test]
    async fn test_duplicate_events_are_kept() {
        let provider = two_race_provider();
        let dir = tempdir().unwrap();

        let report = collect_season_data(
            &provider,
            2024,
            &events(&["Monaco", "Monaco"]),
            &dir.path().join("out.csv"),
            WriteMode::Overwrite,
        )
        .await
        .unwrap();

        assert_eq!(report.total_rows(), 4);
        assert_eq!(report.succeeded.len(), 2);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let provider = two_race_provider();
        let dir = tempdir().unwrap();
        let output = dir.path().join("missing").join("out.csv");

        let err = collect_season_data(
            &provider,
            2024,
            &events(&["Bahrain"]),
            &output,
            WriteMode::Overwrite,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::WriteFailure { .. }));
    }

    #[test]
    fn test_season_header_appends_tag_columns() {
        let header = SeasonLapRecord::header();
        assert_eq!(header.len(), 16);
        assert_eq!(header[13], "LapTimeSeconds");
        assert_eq!(header[14], "GrandPrix");
        assert_eq!(header[15], "Year");
    }
}
