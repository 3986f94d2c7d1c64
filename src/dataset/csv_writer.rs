//! CSV persistence for lap datasets

use chrono::TimeDelta;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{info, instrument, warn};

use super::projection::{LAP_COLUMNS, LapRecord};
use crate::error::AppError;

/// How `save_to_csv` treats an existing target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Replace the file and write a header
    #[default]
    Overwrite,
    /// Add rows after existing content without repeating the header. A
    /// missing or empty target is written in full, header included.
    Append,
}

/// What a write actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub rows_written: usize,
    pub header_written: bool,
}

/// A row type that can be written to CSV with a fixed header.
pub trait CsvRow {
    fn header() -> Vec<&'static str>;
    fn to_record(&self) -> Vec<String>;
}

impl CsvRow for LapRecord {
    fn header() -> Vec<&'static str> {
        LAP_COLUMNS.to_vec()
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.driver.clone(),
            self.driver_number.clone(),
            self.lap_number.to_string(),
            format_optional_duration(self.lap_time),
            format_optional_duration(self.sector1_time),
            format_optional_duration(self.sector2_time),
            format_optional_duration(self.sector3_time),
            self.compound.clone().unwrap_or_default(),
            self.tyre_life.map(|v| v.to_string()).unwrap_or_default(),
            self.fresh_tyre.map(format_bool).unwrap_or_default().to_string(),
            self.team.clone().unwrap_or_default(),
            self.track_status.clone().unwrap_or_default(),
            format_bool(self.is_personal_best).to_string(),
            self.lap_time_seconds.map(format_float).unwrap_or_default(),
        ]
    }
}

/// Writes `rows` to `path` as comma separated values.
///
/// The parent directory must already exist; any failure to encode, open or
/// write the file is a `WriteFailure`. Header compatibility with an existing
/// file is not checked in append mode. Appending to a file whose last line
/// is unterminated adds the missing newline first.
#[instrument(skip(rows), fields(rows = rows.len()))]
pub async fn save_to_csv<T: CsvRow>(
    rows: &[T],
    path: &Path,
    mode: WriteMode,
) -> Result<WriteOutcome, AppError> {
    let (header_written, needs_newline) = match mode {
        WriteMode::Overwrite => (true, false),
        WriteMode::Append if has_content(path).await => {
            let terminated = ends_with_newline(path)
                .await
                .map_err(|e| AppError::write_failure(path, e))?;
            if !terminated {
                warn!(
                    "Append target {} does not end with a newline, adding one",
                    path.display()
                );
            }
            (false, !terminated)
        }
        WriteMode::Append => {
            info!(
                "Append target {} is missing or empty, writing it with a header",
                path.display()
            );
            (true, false)
        }
    };

    let mut bytes = Vec::new();
    if needs_newline {
        bytes.push(b'\n');
    }
    bytes.extend(encode_rows(rows, header_written).map_err(|e| AppError::write_failure(path, e))?);

    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Overwrite => options.write(true).truncate(true),
        WriteMode::Append => options.append(true),
    };

    let mut file = options
        .open(path)
        .await
        .map_err(|e| AppError::write_failure(path, e))?;
    file.write_all(&bytes)
        .await
        .map_err(|e| AppError::write_failure(path, e))?;
    file.flush()
        .await
        .map_err(|e| AppError::write_failure(path, e))?;

    info!("Data saved to: {} ({} rows)", path.display(), rows.len());

    Ok(WriteOutcome {
        path: path.to_path_buf(),
        rows_written: rows.len(),
        header_written,
    })
}

fn encode_rows<T: CsvRow>(rows: &[T], include_header: bool) -> std::io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if include_header {
        writer.write_record(T::header())?;
    }
    for row in rows {
        writer.write_record(row.to_record())?;
    }

    writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.to_string()))
}

async fn has_content(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

/// Only called for non-empty files
async fn ends_with_newline(path: &Path) -> std::io::Result<bool> {
    let mut file = fs::File::open(path).await?;
    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

/// Formats a duration the way pandas prints a `Timedelta`,
/// e.g. `0 days 00:01:32.456000`, so files stay compatible with older
/// datasets.
pub fn format_duration(duration: TimeDelta) -> String {
    let total_micros = duration
        .num_microseconds()
        .unwrap_or_else(|| duration.num_milliseconds().saturating_mul(1_000));
    let sign = if total_micros < 0 { "-" } else { "" };
    let total_micros = total_micros.unsigned_abs();

    let micros = total_micros % 1_000_000;
    let total_seconds = total_micros / 1_000_000;
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    format!("{sign}{days} days {hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
}

fn format_optional_duration(duration: Option<TimeDelta>) -> String {
    duration.map(format_duration).unwrap_or_default()
}

fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Floats keep a decimal point even when whole (`92.0`)
fn format_float(value: f64) -> String {
    format!("{value:?}")
}
