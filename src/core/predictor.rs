// Rule-table crowd prediction.
//
// Each factor is a whole percentage and the chain is composed with integer
// arithmetic, so 1000 at 140% and 70% is exactly 980.
//
// The model never sees a location's capacity. The density/risk it reports come
// from fixed headcount bands and are advisory: the simulator relabels every
// reading against the real capacity.

use super::model::{DayType, Density, Headcount, RiskLevel, Weather};

/// Inputs to a prediction
#[derive(Debug, Clone, Copy)]
pub struct PredictionFeatures<'a> {
    /// Local hour of day, 0-23
    pub hour: u32,
    pub location_id: &'a str,
    pub weather: Weather,
    pub day_type: DayType,
    pub historical_average: Headcount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub predicted_count: Headcount,
    /// Advisory only, from absolute headcount bands
    pub density: Density,
    /// Advisory only, from absolute headcount bands
    pub risk_level: RiskLevel,
}

pub trait PredictionModel {
    fn predict(&self, features: &PredictionFeatures<'_>) -> Prediction;
}

/// Time-of-day band. The ranges are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourBand {
    /// 06:00 to 09:59
    MorningPeak,
    /// 17:00 to 20:59
    EveningPeak,
    /// 22:00 to 05:59
    Night,
    OffPeak,
}

impl HourBand {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=9 => Self::MorningPeak,
            17..=20 => Self::EveningPeak,
            0..=5 => Self::Night,
            h if h >= 22 => Self::Night,
            _ => Self::OffPeak,
        }
    }

    pub fn percent(&self) -> u64 {
        match self {
            Self::MorningPeak => 130,
            Self::EveningPeak => 140,
            Self::Night => 50,
            Self::OffPeak => 100,
        }
    }
}

pub fn weather_percent(weather: Weather) -> u64 {
    match weather {
        Weather::Rainy => 70,
        Weather::Sunny => 110,
        Weather::Cloudy => 100,
    }
}

pub fn day_type_percent(day_type: DayType) -> u64 {
    match day_type {
        DayType::Weekend => 120,
        DayType::Festival => 150,
        DayType::Normal => 100,
    }
}

/// The hour, weather and day-type rule table.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedModel;

impl PredictionModel for RuleBasedModel {
    fn predict(&self, features: &PredictionFeatures<'_>) -> Prediction {
        let predicted_count = predict(
            features.hour,
            features.weather,
            features.day_type,
            features.historical_average,
        );
        Prediction {
            predicted_count,
            density: advisory_density(predicted_count),
            risk_level: advisory_risk(predicted_count),
        }
    }
}

/// Apply the hour, weather and day-type multipliers to `historical_average`, floored.
pub fn predict(
    hour: u32,
    weather: Weather,
    day_type: DayType,
    historical_average: Headcount,
) -> Headcount {
    const PERCENT_CUBED: u64 = 100 * 100 * 100;

    let scaled = u64::from(historical_average)
        * HourBand::from_hour(hour).percent()
        * weather_percent(weather)
        * day_type_percent(day_type);
    Headcount::try_from(scaled / PERCENT_CUBED).unwrap_or(Headcount::MAX)
}

fn advisory_density(count: Headcount) -> Density {
    if count < 1000 {
        Density::Low
    } else if count < 3000 {
        Density::Medium
    } else {
        Density::High
    }
}

fn advisory_risk(count: Headcount) -> RiskLevel {
    if count < 2000 {
        RiskLevel::Safe
    } else if count < 4000 {
        RiskLevel::Warning
    } else {
        RiskLevel::Critical
    }
}
