use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::data_fetcher::models::{
    ApiDriver, ApiLap, ApiRaceControl, ApiStint, Session, SessionId, SessionKind, SessionLap,
    seconds_to_duration,
};
use crate::data_fetcher::provider::SessionProvider;
use crate::error::AppError;

/// Test utilities for creating mock data and testing scenarios
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Creates a complete session lap for a driver
    pub fn session_lap(driver: &str, driver_number: u32, lap_number: u32, seconds: f64) -> SessionLap {
        SessionLap {
            driver: driver.to_string(),
            driver_number: driver_number.to_string(),
            lap_number,
            lap_time: seconds_to_duration(seconds),
            sector1_time: seconds_to_duration(seconds * 0.3),
            sector2_time: seconds_to_duration(seconds * 0.4),
            sector3_time: seconds_to_duration(seconds * 0.3),
            compound: Some("MEDIUM".to_string()),
            tyre_life: Some(lap_number),
            fresh_tyre: Some(true),
            stint: Some(1),
            team: Some("Test Team".to_string()),
            track_status: Some("1".to_string()),
            is_personal_best: false,
            is_pit_out_lap: false,
            lap_start_date: None,
        }
    }

    /// Creates a lap without a lap time, as the provider reports for laps
    /// that were not completed or not timed
    pub fn incomplete_lap(driver: &str, driver_number: u32, lap_number: u32) -> SessionLap {
        SessionLap {
            lap_time: None,
            sector3_time: None,
            ..Self::session_lap(driver, driver_number, lap_number, 100.0)
        }
    }

    /// Creates a session with the given laps
    pub fn session(season: i32, event: &str, kind: SessionKind, laps: Vec<SessionLap>) -> Session {
        Session {
            id: SessionId::new(season, event, kind),
            session_key: 1,
            meeting_name: format!("{event} Grand Prix"),
            laps,
        }
    }

    /// Creates a provider lap row
    pub fn api_lap(driver_number: u32, lap_number: u32, duration: Option<f64>) -> ApiLap {
        ApiLap {
            driver_number,
            lap_number,
            lap_duration: duration,
            duration_sector_1: duration.map(|d| d * 0.3),
            duration_sector_2: duration.map(|d| d * 0.4),
            duration_sector_3: duration.map(|d| d * 0.3),
            is_pit_out_lap: Some(false),
            date_start: None,
        }
    }

    /// Creates a provider stint row
    pub fn api_stint(
        driver_number: u32,
        stint_number: u32,
        lap_start: u32,
        lap_end: Option<u32>,
        compound: &str,
        tyre_age_at_start: u32,
    ) -> ApiStint {
        ApiStint {
            driver_number,
            stint_number,
            lap_start: Some(lap_start),
            lap_end,
            compound: Some(compound.to_string()),
            tyre_age_at_start: Some(tyre_age_at_start),
        }
    }

    /// Creates a provider driver row
    pub fn api_driver(driver_number: u32, acronym: &str, team: &str) -> ApiDriver {
        ApiDriver {
            driver_number,
            name_acronym: Some(acronym.to_string()),
            full_name: None,
            team_name: Some(team.to_string()),
        }
    }

    /// Creates a race control message raised on a lap
    pub fn race_control_message(
        category: &str,
        flag: Option<&str>,
        lap_number: u32,
        message: &str,
    ) -> ApiRaceControl {
        ApiRaceControl {
            date: None,
            category: category.to_string(),
            flag: flag.map(str::to_string),
            scope: Some("Track".to_string()),
            lap_number: Some(lap_number),
            message: message.to_string(),
        }
    }
}

/// In-memory provider serving fixed sessions; unknown sessions are
/// reported as unavailable. Records every request in order.
#[derive(Debug, Default)]
pub struct MockProvider {
    sessions: HashMap<SessionId, Vec<SessionLap>>,
    failures: HashMap<SessionId, String>,
    requests: Mutex<Vec<SessionId>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `laps` for the race of `event`
    pub fn with_race(self, season: i32, event: &str, laps: Vec<SessionLap>) -> Self {
        self.with_session(SessionId::new(season, event, SessionKind::Race), laps)
    }

    pub fn with_session(mut self, id: SessionId, laps: Vec<SessionLap>) -> Self {
        self.sessions.insert(id, laps);
        self
    }

    /// Makes the race of `event` fail with a server error instead of a
    /// missing-data error
    pub fn with_failing_race(mut self, season: i32, event: &str, message: &str) -> Self {
        self.failures.insert(
            SessionId::new(season, event, SessionKind::Race),
            message.to_string(),
        );
        self
    }

    /// Session ids requested so far, in request order
    pub fn requests(&self) -> Vec<SessionId> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SessionProvider for MockProvider {
    async fn fetch_session(&self, id: &SessionId) -> Result<Session, AppError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(id.clone());
        }

        if let Some(message) = self.failures.get(id) {
            return Err(AppError::api_server_error(500, message.clone(), "mock://provider"));
        }

        match self.sessions.get(id) {
            Some(laps) if !laps.is_empty() => Ok(Session {
                id: id.clone(),
                session_key: 1,
                meeting_name: format!("{} Grand Prix", id.event),
                laps: laps.clone(),
            }),
            Some(_) => Err(AppError::data_unavailable(id, "session has no lap data")),
            None => Err(AppError::data_unavailable(id, "event not found")),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_serves_and_records() {
        let provider = MockProvider::new()
            .with_race(2024, "Bahrain", vec![TestDataBuilder::session_lap("VER", 1, 1, 95.0)]);

        let ok = provider
            .fetch_session(&SessionId::new(2024, "Bahrain", SessionKind::Race))
            .await;
        let missing = provider
            .fetch_session(&SessionId::new(2024, "Imola", SessionKind::Race))
            .await;

        assert_eq!(ok.unwrap().laps.len(), 1);
        assert!(missing.unwrap_err().is_data_unavailable());
        assert_eq!(provider.requests().len(), 2);
    }

    #[test]
    fn test_incomplete_lap_has_no_lap_time() {
        let lap = TestDataBuilder::incomplete_lap("HAM", 44, 3);
        assert_eq!(lap.lap_time, None);
        assert_eq!(lap.lap_number, 3);
        assert!(lap.sector1_time.is_some());
    }
}
