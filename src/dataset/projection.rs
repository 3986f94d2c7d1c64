use chrono::TimeDelta;

use crate::data_fetcher::models::{Session, SessionLap};

/// Exported lap columns in output order. The last one is derived.
pub const LAP_COLUMNS: [&str; 14] = [
    "Driver",
    "DriverNumber",
    "LapNumber",
    "LapTime",
    "Sector1Time",
    "Sector2Time",
    "Sector3Time",
    "Compound",
    "TyreLife",
    "FreshTyre",
    "Team",
    "TrackStatus",
    "IsPersonalBest",
    "LapTimeSeconds",
];

/// One projected lap row.
#[derive(Debug, Clone, PartialEq)]
pub struct LapRecord {
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
    pub team: Option<String>,
    pub track_status: Option<String>,
    pub is_personal_best: bool,
    /// `lap_time` in seconds; absent whenever `lap_time` is
    pub lap_time_seconds: Option<f64>,
}

/// Projected laps of one session, in provider row order.
pub type LapDataset = Vec<LapRecord>;

/// Selects the exported columns from every lap of `session` and derives
/// `LapTimeSeconds`. The result owns its data; no rows are dropped.
pub fn project(session: &Session) -> LapDataset {
    session.laps().iter().map(project_lap).collect()
}

pub fn project_lap(lap: &SessionLap) -> LapRecord {
    LapRecord {
        driver: lap.driver.clone(),
        driver_number: lap.driver_number.clone(),
        lap_number: lap.lap_number,
        lap_time: lap.lap_time,
        sector1_time: lap.sector1_time,
        sector2_time: lap.sector2_time,
        sector3_time: lap.sector3_time,
        compound: lap.compound.clone(),
        tyre_life: lap.tyre_life,
        fresh_tyre: lap.fresh_tyre,
        team: lap.team.clone(),
        track_status: lap.track_status.clone(),
        is_personal_best: lap.is_personal_best,
        lap_time_seconds: lap.lap_time.map(total_seconds),
    }
}

/// Duration as fractional seconds, microsecond resolution
pub fn total_seconds(duration: TimeDelta) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => duration.num_milliseconds() as f64 / 1_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::SessionKind;
    use crate::testing_utils::TestDataBuilder;

    fn monaco() -> Session {
        TestDataBuilder::session(
            2024,
            "Monaco",
            SessionKind::Race,
            vec![
                TestDataBuilder::session_lap("VER", 1, 1, 78.456),
                TestDataBuilder::incomplete_lap("VER", 1, 2),
                TestDataBuilder::session_lap("LEC", 16, 1, 77.9),
            ],
        )
    }

    #[test]
    fn test_columns_are_thirteen_plus_derived() {
        assert_eq!(LAP_COLUMNS.len(), 14);
        assert_eq!(LAP_COLUMNS[0], "Driver");
        assert_eq!(LAP_COLUMNS[12], "IsPersonalBest");
        assert_eq!(LAP_COLUMNS[13], "LapTimeSeconds");
    }

    #[test]
    fn test_lap_time_converted_to_seconds() {
        let dataset = project(&monaco());
        assert_eq!(dataset[0].lap_time_seconds, Some(78.456));
        assert_eq!(dataset[2].lap_time_seconds, Some(77.9));
    }

    #[test]
    fn test_missing_lap_time_yields_missing_seconds() {
        let dataset = project(&monaco());
        assert_eq!(dataset[1].lap_time, None);
        assert_eq!(dataset[1].lap_time_seconds, None);
    }

    #[test]
    fn test_projection_keeps_every_row_in_order() {
        let session = monaco();
        let dataset = project(&session);
        assert_eq!(dataset.len(), session.laps().len());
        let keys: Vec<(&str, u32)> = dataset
            .iter()
            .map(|r| (r.driver.as_str(), r.lap_number))
            .collect();
        assert_eq!(keys, vec![("VER", 1), ("VER", 2), ("LEC", 1)]);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let session = monaco();
        assert_eq!(project(&session), project(&session));
        assert_eq!(project(&session), project(&session.clone()));
    }

    #[test]
    fn test_projection_copies_source_fields() {
        let session = monaco();
        let record = &project(&session)[0];
        let lap = &session.laps()[0];

        assert_eq!(record.driver_number, "1");
        assert_eq!(record.sector2_time, lap.sector2_time);
        assert_eq!(record.compound, lap.compound);
        assert_eq!(record.tyre_life, lap.tyre_life);
        assert_eq!(record.fresh_tyre, lap.fresh_tyre);
        assert_eq!(record.team, lap.team);
        assert_eq!(record.track_status, lap.track_status);
        assert_eq!(record.is_personal_best, lap.is_personal_best);
    }

    #[test]
    fn test_total_seconds() {
        assert_eq!(total_seconds(TimeDelta::milliseconds(92_456)), 92.456);
        assert_eq!(total_seconds(TimeDelta::zero()), 0.0);
    }
}
