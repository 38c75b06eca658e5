// Synthetic backfill of past readings for trend analysis.
//
// Independent of the live simulator: it never reads the live snapshot and
// never touches the alert store.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::LocationCatalog;
use super::environment::{draw_day_type, draw_weather, OccupancyProfile};
use super::model::{CrowdReading, Headcount, RiskLevel};

const HOURS_PER_DAY: u32 = 24;

/// One reading per location for every hour of each of the `days` calendar
/// days before `now`, oldest first. Within an hour, locations keep catalog
/// order.
pub fn generate_history<R: Rng + ?Sized>(
    catalog: &LocationCatalog,
    days: u32,
    now: NaiveDateTime,
    rng: &mut R,
) -> Vec<CrowdReading> {
    let today = now.date();
    let mut readings = Vec::new();

    for days_ago in (1..=days).rev() {
        let Some(date) = today.checked_sub_signed(Duration::days(i64::from(days_ago))) else {
            continue;
        };
        for hour in 0..HOURS_PER_DAY {
            let Some(timestamp) = date.and_hms_opt(hour, 0, 0) else {
                continue;
            };
            for location in catalog {
                let count = OccupancyProfile::HISTORICAL.sample(location, hour, rng);
                let weather = draw_weather(rng);
                let day_type = draw_day_type(date, rng);
                readings.push(CrowdReading::classified(
                    location, timestamp, count, count, weather, day_type,
                ));
            }
        }
    }

    log::debug!(
        "Generated {} historical readings over {} days",
        readings.len(),
        days
    );
    readings
}

/// Average crowd at one hour of the day across all backfilled days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub hour: u32,
    /// Mean current count, rounded half up
    pub actual: Headcount,
    /// Mean predicted count, rounded half up
    pub predicted: Headcount,
    /// Risk of the first reading seen for this hour
    pub risk: RiskLevel,
}

#[derive(Default)]
struct HourAccumulator {
    actual: u64,
    predicted: u64,
    samples: u64,
    risk: Option<RiskLevel>,
}

/// Group readings by hour of day and average them, optionally for one location.
/// Hours without readings are left out; the result is sorted by hour.
pub fn hourly_profile(readings: &[CrowdReading], location_id: Option<&str>) -> Vec<HourlyPoint> {
    let mut hours: BTreeMap<u32, HourAccumulator> = BTreeMap::new();
    for reading in readings
        .iter()
        .filter(|reading| location_id.map_or(true, |id| reading.location_id == id))
    {
        let acc = hours.entry(reading.timestamp.hour()).or_default();
        acc.actual += u64::from(reading.current_count);
        acc.predicted += u64::from(reading.predicted_count);
        acc.samples += 1;
        acc.risk.get_or_insert(reading.risk_level);
    }

    hours
        .into_iter()
        .map(|(hour, acc)| HourlyPoint {
            hour,
            actual: rounded_mean(acc.actual, acc.samples),
            predicted: rounded_mean(acc.predicted, acc.samples),
            risk: acc.risk.unwrap_or(RiskLevel::Safe),
        })
        .collect()
}

fn rounded_mean(total: u64, samples: u64) -> Headcount {
    if samples == 0 {
        return 0;
    }
    Headcount::try_from((total + samples / 2) / samples).unwrap_or(Headcount::MAX)
}
