use crate::data_fetcher::models::ApiMeeting;

/// Resolves a free-form event name ("Monaco", "Saudi Arabia", "British Grand
/// Prix") to one of the season's meetings.
///
/// Ranking, best first:
/// 1. exact meeting name
/// 2. exact country, location or circuit short name
/// 3. meeting name containing the event
///
/// Testing meetings only match when the event itself mentions testing, so
/// "Bahrain" resolves to the Grand Prix rather than pre-season testing.
/// Ties keep the provider's (calendar) order.
pub fn resolve_meeting<'a>(meetings: &'a [ApiMeeting], event: &str) -> Option<&'a ApiMeeting> {
    let wanted = normalize(event);
    if wanted.is_empty() {
        return None;
    }
    let wants_testing = wanted.contains("test");

    meetings
        .iter()
        .filter(|m| wants_testing || !normalize(&m.meeting_name).contains("test"))
        .filter_map(|m| match_rank(m, &wanted).map(|rank| (rank, m)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, m)| m)
}

fn match_rank(meeting: &ApiMeeting, wanted: &str) -> Option<u8> {
    let name = normalize(&meeting.meeting_name);
    if name == wanted {
        return Some(0);
    }

    let exact_alias = [
        meeting.country_name.as_deref(),
        meeting.location.as_deref(),
        meeting.circuit_short_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|alias| normalize(alias) == wanted);
    if exact_alias {
        return Some(1);
    }

    name.contains(wanted).then_some(2)
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(key: i64, name: &str, country: &str, location: &str, circuit: &str) -> ApiMeeting {
        ApiMeeting {
            meeting_key: key,
            meeting_name: name.to_string(),
            meeting_official_name: None,
            location: Some(location.to_string()),
            country_name: Some(country.to_string()),
            circuit_short_name: Some(circuit.to_string()),
            date_start: None,
            year: 2024,
        }
    }

    fn season() -> Vec<ApiMeeting> {
        vec![
            meeting(1228, "Pre-Season Testing", "Bahrain", "Sakhir", "Sakhir"),
            meeting(1229, "Bahrain Grand Prix", "Bahrain", "Sakhir", "Sakhir"),
            meeting(1230, "Saudi Arabian Grand Prix", "Saudi Arabia", "Jeddah", "Jeddah"),
            meeting(1236, "Monaco Grand Prix", "Monaco", "Monte Carlo", "Monte Carlo"),
            meeting(1240, "British Grand Prix", "United Kingdom", "Silverstone", "Silverstone"),
        ]
    }

    #[test]
    fn test_country_name_skips_testing() {
        let meetings = season();
        let found = resolve_meeting(&meetings, "Bahrain").unwrap();
        assert_eq!(found.meeting_key, 1229);
    }

    #[test]
    fn test_testing_when_asked_for() {
        let meetings = season();
        let found = resolve_meeting(&meetings, "Pre-Season Testing").unwrap();
        assert_eq!(found.meeting_key, 1228);
    }

    #[test]
    fn test_exact_alias_and_substring() {
        let meetings = season();
        assert_eq!(resolve_meeting(&meetings, "saudi arabia").unwrap().meeting_key, 1230);
        assert_eq!(resolve_meeting(&meetings, "Silverstone").unwrap().meeting_key, 1240);
        assert_eq!(resolve_meeting(&meetings, "British").unwrap().meeting_key, 1240);
        assert_eq!(
            resolve_meeting(&meetings, "Monaco  Grand Prix").unwrap().meeting_key,
            1236
        );
    }

    #[test]
    fn test_unknown_event() {
        let meetings = season();
        assert!(resolve_meeting(&meetings, "NoSuchGP").is_none());
        assert!(resolve_meeting(&meetings, "   ").is_none());
    }
}
