//! Projection of session laps into exported rows, season collection and CSV
//! output.

pub mod collector;
pub mod csv_writer;
pub mod projection;

pub use collector::{
    CollectionReport, EventFailure, SeasonDataset, SeasonLapRecord, collect_season_data,
    fetch_one,
};
pub use csv_writer::{CsvRow, WriteMode, WriteOutcome, format_duration, save_to_csv};
pub use projection::{LAP_COLUMNS, LapDataset, LapRecord, project, project_lap};
