//! Application-wide constants and configuration values
//!
//! This module centralizes magic numbers, default locations and
//! provider constants so they can be tuned in one place.

/// Application directory name used under the platform config and cache dirs
pub const APP_DIR_NAME: &str = "f1_lap_collector";

/// Default log file name
pub const LOG_FILE_NAME: &str = "f1_lap_collector.log";

/// Default provider API base URL (OpenF1 compatible)
pub const DEFAULT_API_DOMAIN: &str = "https://api.openf1.org/v1";

/// Default directory output files are written to when given a relative name
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Number of HTTP responses kept in the in-memory layer of the response cache
pub const MEMORY_CACHE_CAPACITY: usize = 64;

/// Cache TTL (Time To Live) values in seconds
pub mod cache_ttl {
    /// TTL for meeting and session listings. New sessions appear as the
    /// season progresses, so these must be refreshed.
    pub const SCHEDULE_SECONDS: u64 = 3600;

    /// Time after a session's scheduled end before its data is treated as
    /// final. The provider keeps publishing laps and corrections while a
    /// session runs and shortly after.
    pub const SESSION_SETTLE_SECONDS: i64 = 3 * 3600;
}

/// Output file naming
pub mod output {
    /// Default season output file name, `{year}` is replaced with the season
    pub const SEASON_FILE_TEMPLATE: &str = "f1_{year}_data.csv";

    /// Column tag holding the event name in season output
    pub const EVENT_COLUMN: &str = "GrandPrix";

    /// Column tag holding the season year in season output
    pub const SEASON_COLUMN: &str = "Year";
}

/// Track status codes as used by the timing feed
pub mod track_status {
    pub const GREEN: &str = "1";
    pub const YELLOW: &str = "2";
    pub const SAFETY_CAR: &str = "4";
    pub const RED: &str = "5";
    pub const VSC_DEPLOYED: &str = "6";
    pub const VSC_ENDING: &str = "7";
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API domain override
    pub const API_DOMAIN: &str = "F1_API_DOMAIN";

    /// Environment variable for cache directory override
    pub const CACHE_DIR: &str = "F1_CACHE_DIR";

    /// Environment variable for output data directory override
    pub const DATA_DIR: &str = "F1_DATA_DIR";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "F1_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "F1_HTTP_TIMEOUT";
}
