use crate::error::AppError;
use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;

/// The on-track activities a session lookup can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Practice1,
    Practice2,
    Practice3,
    Qualifying,
    Race,
}

impl SessionKind {
    pub const ALL: [SessionKind; 5] = [
        SessionKind::Practice1,
        SessionKind::Practice2,
        SessionKind::Practice3,
        SessionKind::Qualifying,
        SessionKind::Race,
    ];

    /// Short code used on the command line (`FP1`, `Q`, `R`, ...)
    pub fn code(self) -> &'static str {
        match self {
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
            SessionKind::Qualifying => "Q",
            SessionKind::Race => "R",
        }
    }

    /// Session name as reported by the provider
    pub fn provider_name(self) -> &'static str {
        match self {
            SessionKind::Practice1 => "Practice 1",
            SessionKind::Practice2 => "Practice 2",
            SessionKind::Practice3 => "Practice 3",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Race => "Race",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_name())
    }
}

impl FromStr for SessionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SessionKind::ALL
            .into_iter()
            .find(|kind| {
                kind.code().eq_ignore_ascii_case(wanted)
                    || kind.provider_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                AppError::config_error(format!(
                    "Unknown session type '{wanted}', expected one of FP1, FP2, FP3, Q, R"
                ))
            })
    }
}

/// Lookup key for one session of one event in one season.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId {
    pub season: i32,
    pub event: String,
    pub kind: SessionKind,
}

impl SessionId {
    pub fn new(season: i32, event: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            season,
            event: event.into(),
            kind,
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.season, self.event, self.kind)
    }
}

/// One lap of one driver, as assembled by the provider layer.
///
/// Carries more than the exported columns; projection picks what it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLap {
    pub driver: String,
    pub driver_number: String,
    pub lap_number: u32,
    pub lap_time: Option<TimeDelta>,
    pub sector1_time: Option<TimeDelta>,
    pub sector2_time: Option<TimeDelta>,
    pub sector3_time: Option<TimeDelta>,
    pub compound: Option<String>,
    pub tyre_life: Option<u32>,
    pub fresh_tyre: Option<bool>,
    pub stint: Option<u32>,
    pub team: Option<String>,
    pub track_status: Option<String>,
    pub is_personal_best: bool,
    pub is_pit_out_lap: bool,
    pub lap_start_date: Option<String>,
}

/// A loaded session: its identity plus every lap the provider reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    /// Provider side key of the session
    pub session_key: i64,
    /// Official meeting name the event resolved to
    pub meeting_name: String,
    pub laps: Vec<SessionLap>,
}

impl Session {
    pub fn laps(&self) -> &[SessionLap] {
        &self.laps
    }
}

/// Converts provider seconds into a duration with millisecond precision.
/// Negative or non-finite values are treated as missing.
pub fn seconds_to_duration(seconds: f64) -> Option<TimeDelta> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_kind_parses_codes_and_names() {
        assert_eq!("R".parse::<SessionKind>().unwrap(), SessionKind::Race);
        assert_eq!("fp2".parse::<SessionKind>().unwrap(), SessionKind::Practice2);
        assert_eq!("q".parse::<SessionKind>().unwrap(), SessionKind::Qualifying);
        assert_eq!(
            "Practice 3".parse::<SessionKind>().unwrap(),
            SessionKind::Practice3
        );
        assert_eq!(" race ".parse::<SessionKind>().unwrap(), SessionKind::Race);
    }

    #[test]
    fn test_session_kind_rejects_unknown() {
        let err = "Sprint Shootout".parse::<SessionKind>().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_session_id_display() {
        let id = SessionId::new(2024, "Bahrain", SessionKind::Qualifying);
        assert_eq!(id.to_string(), "2024 Bahrain Qualifying");
    }

    #[test]
    fn test_seconds_to_duration() {
        let lap = seconds_to_duration(92.4567).unwrap();
        assert_eq!(lap.num_milliseconds(), 92457);
        assert_eq!(seconds_to_duration(-1.0), None);
        assert_eq!(seconds_to_duration(f64::NAN), None);
    }
}
