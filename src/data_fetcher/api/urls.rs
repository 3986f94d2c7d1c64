//! URL building utilities for provider endpoints

/// Builds the meetings URL listing every race weekend of a season.
///
/// # Example
/// ```
/// use f1_lap_collector::data_fetcher::api::build_meetings_url;
///
/// let url = build_meetings_url("https://api.example.com/v1", 2024);
/// assert_eq!(url, "https://api.example.com/v1/meetings?year=2024");
/// ```
pub fn build_meetings_url(api_domain: &str, season: i32) -> String {
    format!("{api_domain}/meetings?year={season}")
}

/// Builds the sessions URL for one meeting.
///
/// # Example
/// ```
/// use f1_lap_collector::data_fetcher::api::build_sessions_url;
///
/// let url = build_sessions_url("https://api.example.com/v1", 1236);
/// assert_eq!(url, "https://api.example.com/v1/sessions?meeting_key=1236");
/// ```
pub fn build_sessions_url(api_domain: &str, meeting_key: i64) -> String {
    format!("{api_domain}/sessions?meeting_key={meeting_key}")
}

/// Builds a per-session data URL (`laps`, `stints`, `drivers`, `race_control`).
///
/// # Example
/// ```
/// use f1_lap_collector::data_fetcher::api::build_session_data_url;
///
/// let url = build_session_data_url("https://api.example.com/v1", "laps", 9523);
/// assert_eq!(url, "https://api.example.com/v1/laps?session_key=9523");
/// ```
pub fn build_session_data_url(api_domain: &str, resource: &str, session_key: i64) -> String {
    format!("{api_domain}/{resource}?session_key={session_key}")
}
