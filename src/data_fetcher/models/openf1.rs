use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMeeting {
    pub meeting_key: i64,
    pub meeting_name: String,
    #[serde(default)]
    pub meeting_official_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSession {
    pub session_key: i64,
    pub meeting_key: i64,
    pub session_name: String,
    #[serde(default)]
    pub session_type: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLap {
    pub driver_number: u32,
    pub lap_number: u32,
    #[serde(default)]
    pub lap_duration: Option<f64>,
    #[serde(default)]
    pub duration_sector_1: Option<f64>,
    #[serde(default)]
    pub duration_sector_2: Option<f64>,
    #[serde(default)]
    pub duration_sector_3: Option<f64>,
    #[serde(default)]
    pub is_pit_out_lap: Option<bool>,
    #[serde(default)]
    pub date_start: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStint {
    pub driver_number: u32,
    pub stint_number: u32,
    #[serde(default)]
    pub lap_start: Option<u32>,
    #[serde(default)]
    pub lap_end: Option<u32>,
    #[serde(default)]
    pub compound: Option<String>,
    #[serde(default)]
    pub tyre_age_at_start: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDriver {
    pub driver_number: u32,
    #[serde(default)]
    pub name_acronym: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRaceControl {
    #[serde(default)]
    pub date: Option<String>,
    pub category: String,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub lap_number: Option<u32>,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lap_with_null_duration_deserializes() {
        let json = r#"{
            "driver_number": 1,
            "lap_number": 1,
            "lap_duration": null,
            "duration_sector_1": null,
            "duration_sector_2": 41.2,
            "duration_sector_3": 30.1,
            "is_pit_out_lap": false,
            "date_start": null,
            "i1_speed": 280,
            "session_key": 9472
        }"#;
        let lap: ApiLap = serde_json::from_str(json).unwrap();
        assert_eq!(lap.lap_duration, None);
        assert_eq!(lap.duration_sector_2, Some(41.2));
    }

    #[test]
    fn test_session_end_is_optional() {
        let json = r#"{"session_key": 9523, "meeting_key": 1236, "session_name": "Race",
            "date_end": "2024-05-26T15:00:00+00:00"}"#;
        let session: ApiSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.date_end.as_deref(), Some("2024-05-26T15:00:00+00:00"));

        let json = r#"{"session_key": 9523, "meeting_key": 1236, "session_name": "Race"}"#;
        let session: ApiSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.date_end, None);
    }

    #[test]
    fn test_race_control_without_flag() {
        let json = r#"{
            "date": "2024-05-26T13:03:00+00:00",
            "category": "SafetyCar",
            "flag": null,
            "lap_number": 1,
            "message": "SAFETY CAR DEPLOYED",
            "scope": null
        }"#;
        let message: ApiRaceControl = serde_json::from_str(json).unwrap();
        assert_eq!(message.category, "SafetyCar");
        assert_eq!(message.flag, None);
        assert_eq!(message.lap_number, Some(1));
    }
}
