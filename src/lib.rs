//! F1 lap telemetry collector library
//!
//! Fetches race session data from an OpenF1 compatible provider, projects
//! the per-lap columns used for model training and writes them to CSV,
//! either for one session or combined across a list of races.
//!
//! # Examples
//!
//! ```rust,no_run
//! use f1_lap_collector::config::Config;
//! use f1_lap_collector::data_fetcher::OpenF1Provider;
//! use f1_lap_collector::dataset::{WriteMode, collect_season_data};
//! use f1_lap_collector::error::AppError;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let provider = OpenF1Provider::from_config(&config)?;
//!
//!     let events = vec!["Bahrain".to_string(), "Monaco".to_string()];
//!     let report = collect_season_data(
//!         &provider,
//!         2024,
//!         &events,
//!         Path::new("data/f1_2024_data.csv"),
//!         WriteMode::Overwrite,
//!     )
//!     .await?;
//!
//!     println!("{} laps collected", report.total_rows());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod dataset;
pub mod error;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::{OpenF1Provider, SessionId, SessionKind, SessionProvider};
pub use dataset::{
    CollectionReport, LapDataset, LapRecord, WriteMode, collect_season_data, fetch_one, project,
    save_to_csv,
};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
