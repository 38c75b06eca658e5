// Data model for monitored locations and their crowd readings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::classifier;

pub type LocationId = String;
pub type Headcount = u32;

/// Kind of monitored place
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationCategory {
    Ghat,
    EntryGate,
    FoodStall,
    HealthCenter,
}

impl LocationCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ghat => "Ghat",
            Self::EntryGate => "Entry Gate",
            Self::FoodStall => "Food Stall",
            Self::HealthCenter => "Health Center",
        }
    }
}

/// A monitored place. Created once when the catalog loads, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "type")]
    pub category: LocationCategory,
    /// Display coordinates, unused by the simulation
    pub x: f32,
    pub y: f32,
    pub capacity: Headcount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Low,
    Medium,
    High,
}

impl Density {
    /// Numeric weight used when averaging density across locations
    pub fn score(&self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
}

impl Weather {
    pub fn all() -> &'static [Weather] {
        &[Self::Sunny, Self::Cloudy, Self::Rainy]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Normal,
    Weekend,
    Festival,
}

/// Occupancy of one location at one point in time.
///
/// Density and risk are always derived from `current_count` and the location
/// capacity, so readings are built through [`CrowdReading::classified`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdReading {
    pub location_id: LocationId,
    pub timestamp: NaiveDateTime,
    pub current_count: Headcount,
    pub predicted_count: Headcount,
    pub density: Density,
    pub risk_level: RiskLevel,
    pub weather: Weather,
    pub day_type: DayType,
}

impl CrowdReading {
    pub fn classified(
        location: &Location,
        timestamp: NaiveDateTime,
        current_count: Headcount,
        predicted_count: Headcount,
        weather: Weather,
        day_type: DayType,
    ) -> Self {
        Self {
            location_id: location.id.clone(),
            timestamp,
            current_count,
            predicted_count,
            density: classifier::classify_density(current_count, location.capacity),
            risk_level: classifier::classify_risk(current_count, location.capacity),
            weather,
            day_type,
        }
    }
}
