use chrono::TimeDelta;
use std::collections::HashMap;
use tracing::debug;

use super::track_status::track_status_by_lap;
use crate::data_fetcher::models::{
    ApiDriver, ApiLap, ApiRaceControl, ApiStint, SessionLap, seconds_to_duration,
};

/// Raw per-session payloads as returned by the provider endpoints.
#[derive(Debug, Clone, Default)]
pub struct SessionPayload {
    pub laps: Vec<ApiLap>,
    pub stints: Vec<ApiStint>,
    pub drivers: Vec<ApiDriver>,
    pub race_control: Vec<ApiRaceControl>,
}

/// Joins laps with stint, driver and race control data into session lap rows.
///
/// Rows are ordered by driver (provider driver order, unknown numbers last in
/// ascending order) and then by lap number.
pub fn assemble_session_laps(payload: &SessionPayload) -> Vec<SessionLap> {
    let mut laps_by_driver: HashMap<u32, Vec<&ApiLap>> = HashMap::new();
    for lap in &payload.laps {
        laps_by_driver.entry(lap.driver_number).or_default().push(lap);
    }

    let drivers: HashMap<u32, &ApiDriver> = payload
        .drivers
        .iter()
        .map(|d| (d.driver_number, d))
        .collect();

    let max_lap = payload.laps.iter().map(|l| l.lap_number).max().unwrap_or(0);
    let track_status = track_status_by_lap(&payload.race_control, max_lap);

    let mut rows = Vec::with_capacity(payload.laps.len());
    for driver_number in driver_order(payload) {
        let Some(driver_laps) = laps_by_driver.get_mut(&driver_number) else {
            continue;
        };
        driver_laps.sort_by_key(|l| l.lap_number);

        let driver = drivers.get(&driver_number).copied();
        let stints: Vec<&ApiStint> = payload
            .stints
            .iter()
            .filter(|s| s.driver_number == driver_number)
            .collect();

        let mut best: Option<TimeDelta> = None;
        for lap in driver_laps.iter() {
            let lap_time = lap.lap_duration.and_then(seconds_to_duration);
            let is_pit_out_lap = lap.is_pit_out_lap.unwrap_or(false);
            let is_personal_best = !is_pit_out_lap
                && lap_time.is_some_and(|time| best.is_none_or(|b| time < b));
            if is_personal_best {
                best = lap_time;
            }

            let stint = find_stint(&stints, lap.lap_number);

            rows.push(SessionLap {
                driver: driver
                    .and_then(|d| d.name_acronym.clone())
                    .unwrap_or_else(|| driver_number.to_string()),
                driver_number: driver_number.to_string(),
                lap_number: lap.lap_number,
                lap_time,
                sector1_time: lap.duration_sector_1.and_then(seconds_to_duration),
                sector2_time: lap.duration_sector_2.and_then(seconds_to_duration),
                sector3_time: lap.duration_sector_3.and_then(seconds_to_duration),
                compound: stint.and_then(|s| s.compound.clone()),
                tyre_life: stint.and_then(|s| tyre_life(s, lap.lap_number)),
                fresh_tyre: stint.and_then(|s| s.tyre_age_at_start).map(|age| age == 0),
                stint: stint.map(|s| s.stint_number),
                team: driver.and_then(|d| d.team_name.clone()),
                track_status: track_status.get(&lap.lap_number).cloned(),
                is_personal_best,
                is_pit_out_lap,
                lap_start_date: lap.date_start.clone(),
            });
        }
    }

    debug!(
        "Assembled {} lap rows from {} laps, {} stints, {} drivers",
        rows.len(),
        payload.laps.len(),
        payload.stints.len(),
        payload.drivers.len()
    );

    rows
}

fn driver_order(payload: &SessionPayload) -> Vec<u32> {
    let mut order: Vec<u32> = Vec::new();
    for driver in &payload.drivers {
        if !order.contains(&driver.driver_number) {
            order.push(driver.driver_number);
        }
    }

    let mut unknown: Vec<u32> = payload
        .laps
        .iter()
        .map(|l| l.driver_number)
        .filter(|n| !order.contains(n))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();

    order.extend(unknown);
    order
}

fn find_stint<'a>(stints: &[&'a ApiStint], lap_number: u32) -> Option<&'a ApiStint> {
    stints.iter().copied().find(|s| {
        s.lap_start.is_some_and(|start| start <= lap_number)
            && s.lap_end.is_none_or(|end| lap_number <= end)
    })
}

/// Laps driven on the set including this one
fn tyre_life(stint: &ApiStint, lap_number: u32) -> Option<u32> {
    let start = stint.lap_start?;
    let age = stint.tyre_age_at_start?;
    Some(age + (lap_number - start) + 1)
}
