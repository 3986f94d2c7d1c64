use std::collections::HashMap;

use crate::constants::track_status::{GREEN, RED, SAFETY_CAR, VSC_DEPLOYED, VSC_ENDING, YELLOW};
use crate::data_fetcher::models::ApiRaceControl;

/// Whether a message applies to the whole circuit rather than one sector.
/// Safety car messages always do.
pub fn is_track_wide(message: &ApiRaceControl) -> bool {
    message.category == "SafetyCar"
        || message
            .scope
            .as_deref()
            .is_some_and(|scope| scope.eq_ignore_ascii_case("Track"))
}

/// Maps a race control message to the track status code it raises, if any.
/// Sector clears raise nothing.
pub fn status_code(message: &ApiRaceControl) -> Option<&'static str> {
    match message.category.as_str() {
        "Flag" => match message.flag.as_deref()? {
            "GREEN" | "CLEAR" if is_track_wide(message) => Some(GREEN),
            "YELLOW" | "DOUBLE YELLOW" => Some(YELLOW),
            "RED" => Some(RED),
            _ => None,
        },
        "SafetyCar" => {
            let text = message.message.to_ascii_uppercase();
            if text.contains("VIRTUAL SAFETY CAR DEPLOYED") {
                Some(VSC_DEPLOYED)
            } else if text.contains("VIRTUAL SAFETY CAR ENDING") {
                Some(VSC_ENDING)
            } else if text.contains("SAFETY CAR DEPLOYED") {
                Some(SAFETY_CAR)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Builds the track status string for every lap from 1 to `max_lap`.
///
/// A lap carries the status in force when it started followed by every
/// distinct status raised during it, e.g. `"14"` for a lap on which the
/// safety car was deployed. Only track-wide messages change the status in
/// force for later laps; a sector yellow shows up on its own lap only.
/// Messages without a lap number are ignored.
pub fn track_status_by_lap(messages: &[ApiRaceControl], max_lap: u32) -> HashMap<u32, String> {
    let mut raised: Vec<(u32, &'static str, bool)> = messages
        .iter()
        .filter_map(|m| Some((m.lap_number?, status_code(m)?, is_track_wide(m))))
        .collect();
    // Stable: messages within a lap keep their feed order
    raised.sort_by_key(|(lap, _, _)| *lap);

    let mut by_lap = HashMap::with_capacity(max_lap as usize);
    let mut current = GREEN;
    let mut pending = raised.into_iter().peekable();

    for lap in 1..=max_lap {
        let mut codes = vec![current];
        while let Some((_, code, track_wide)) = pending.next_if(|(l, _, _)| *l <= lap) {
            if !codes.contains(&code) {
                codes.push(code);
            }
            if track_wide {
                current = if code == VSC_ENDING { GREEN } else { code };
            }
        }
        by_lap.insert(lap, codes.concat());
    }

    by_lap
}
