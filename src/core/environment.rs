// Ambient conditions and baseline occupancy.
//
// Live initialization and the historical backfill share one recipe but with
// different constants; see OccupancyProfile::LIVE and OccupancyProfile::HISTORICAL.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

use super::model::{DayType, Headcount, Location, LocationCategory, Weather};

/// Hours counted as peak when picking a baseline multiplier
pub const PEAK_HOURS: [u32; 6] = [6, 7, 8, 17, 18, 19];

const SUNNY_PROBABILITY: f64 = 0.6;
const CLOUDY_PROBABILITY: f64 = 0.25;
const FESTIVAL_PROBABILITY: f64 = 0.1;

pub fn is_peak_hour(hour: u32) -> bool {
    PEAK_HOURS.contains(&hour)
}

/// Constants for the baseline occupancy recipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyProfile {
    pub off_peak: f64,
    pub peak: f64,
    pub ghat_bonus: f64,
    pub entry_gate_bonus: f64,
    pub jitter_low: f64,
    pub jitter_high: f64,
}

impl OccupancyProfile {
    pub const LIVE: Self = Self {
        off_peak: 0.3,
        peak: 0.8,
        ghat_bonus: 1.2,
        entry_gate_bonus: 1.1,
        jitter_low: 0.8,
        jitter_high: 1.2,
    };

    /// Backfill runs with a softer peak and ghat bonus and no entry gate bonus.
    pub const HISTORICAL: Self = Self {
        off_peak: 0.3,
        peak: 0.7,
        ghat_bonus: 1.1,
        entry_gate_bonus: 1.0,
        jitter_low: 0.8,
        jitter_high: 1.2,
    };

    /// Fraction of capacity expected before jitter
    pub fn multiplier(&self, category: LocationCategory, hour: u32) -> f64 {
        let base = if is_peak_hour(hour) {
            self.peak
        } else {
            self.off_peak
        };
        match category {
            LocationCategory::Ghat => base * self.ghat_bonus,
            LocationCategory::EntryGate => base * self.entry_gate_bonus,
            LocationCategory::FoodStall | LocationCategory::HealthCenter => base,
        }
    }

    /// Draw one jittered baseline headcount. Consumes one random value.
    pub fn sample<R: Rng + ?Sized>(&self, location: &Location, hour: u32, rng: &mut R) -> Headcount {
        let jitter = rng.gen_range(self.jitter_low..=self.jitter_high);
        floor_count(f64::from(location.capacity) * self.multiplier(location.category, hour) * jitter)
    }
}

/// Floor to a headcount, clamping negatives and non-finite values to zero.
pub fn floor_count(value: f64) -> Headcount {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let floored = value.floor();
    if floored >= f64::from(Headcount::MAX) {
        Headcount::MAX
    } else {
        floored as Headcount
    }
}

/// 60% sunny, 25% cloudy, 15% rainy. Consumes one random value.
pub fn draw_weather<R: Rng + ?Sized>(rng: &mut R) -> Weather {
    let roll: f64 = rng.gen();
    if roll < SUNNY_PROBABILITY {
        Weather::Sunny
    } else if roll < SUNNY_PROBABILITY + CLOUDY_PROBABILITY {
        Weather::Cloudy
    } else {
        Weather::Rainy
    }
}

/// Weekends are decided by the calendar and consume no randomness; any other
/// day is a festival one time in ten.
pub fn draw_day_type<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> DayType {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return DayType::Weekend;
    }
    let roll: f64 = rng.gen();
    if roll < FESTIVAL_PROBABILITY {
        DayType::Festival
    } else {
        DayType::Normal
    }
}
