// Aggregate statistics and operator recommendations for a snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::alerts::model::{Alert, AlertSeverity};
use super::environment::is_peak_hour;
use super::model::{Density, Location, LocationCategory, RiskLevel, Weather};
use super::simulator::Snapshot;

/// Utilization above which entry restrictions are recommended
const RESTRICT_ENTRY_PERCENT: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    DeployCrowdControl { critical_locations: usize },
    RestrictEntry,
    IncreaseMonitoring,
    PrepareCoveredAreas,
}

impl Recommendation {
    pub fn message(&self) -> String {
        match self {
            Self::DeployCrowdControl { critical_locations } => {
                format!("Immediate action needed at {critical_locations} location(s)")
            }
            Self::RestrictEntry => "Overall capacity approaching limit".to_string(),
            Self::IncreaseMonitoring => "Peak hour detected".to_string(),
            Self::PrepareCoveredAreas => "Weather may affect crowd patterns".to_string(),
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::DeployCrowdControl { .. } => "Deploy crowd control teams",
            Self::RestrictEntry => "Consider entry restrictions",
            Self::IncreaseMonitoring => "Increase monitoring frequency",
            Self::PrepareCoveredAreas => "Prepare covered areas",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub locations: usize,
    pub people: u64,
    pub capacity: u64,
}

impl CategoryStats {
    pub fn utilization_percent(&self) -> u32 {
        percent_of(self.people, self.capacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdInsights {
    pub total_people: u64,
    pub total_capacity: u64,
    /// Rounded to the nearest whole percent
    pub utilization_percent: u32,
    pub safe_locations: usize,
    pub warning_locations: usize,
    pub critical_locations: usize,
    pub high_density_locations: usize,
    pub medium_density_locations: usize,
    /// Mean of low=1, medium=2, high=3 across readings; 0 with no readings
    pub average_density_score: f64,
    pub dominant_weather: Option<Weather>,
    pub trend: TrendDirection,
    /// Active alerts of high severity
    pub critical_alerts: usize,
    /// Active alerts of medium severity
    pub warning_alerts: usize,
    pub by_category: BTreeMap<LocationCategory, CategoryStats>,
    pub peak_hour: bool,
    pub recommendations: Vec<Recommendation>,
}

impl CrowdInsights {
    pub fn compute(
        locations: &[Location],
        snapshot: &Snapshot,
        active_alerts: &[Alert],
        hour: u32,
    ) -> Self {
        let readings: Vec<_> = locations
            .iter()
            .filter_map(|location| snapshot.get(&location.id))
            .collect();

        let total_people: u64 = readings
            .iter()
            .map(|reading| u64::from(reading.current_count))
            .sum();
        let total_predicted: u64 = readings
            .iter()
            .map(|reading| u64::from(reading.predicted_count))
            .sum();
        let total_capacity: u64 = locations
            .iter()
            .map(|location| u64::from(location.capacity))
            .sum();
        let utilization_percent = percent_of(total_people, total_capacity);

        let count_risk = |level: RiskLevel| readings.iter().filter(|r| r.risk_level == level).count();
        let count_density = |density: Density| readings.iter().filter(|r| r.density == density).count();
        let critical_locations = count_risk(RiskLevel::Critical);

        let average_density_score = if readings.is_empty() {
            0.0
        } else {
            let total: u32 = readings.iter().map(|reading| reading.density.score()).sum();
            f64::from(total) / readings.len() as f64
        };

        // Same number of readings on both sides, so comparing sums compares means
        let trend = if total_predicted > total_people {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };

        let mut by_category = BTreeMap::new();
        for location in locations {
            let stats: &mut CategoryStats = by_category.entry(location.category).or_default();
            stats.locations += 1;
            stats.capacity += u64::from(location.capacity);
            stats.people += snapshot
                .get(&location.id)
                .map_or(0, |reading| u64::from(reading.current_count));
        }

        let dominant_weather = dominant_weather(readings.iter().map(|reading| reading.weather));
        let peak_hour = is_peak_hour(hour);

        let mut recommendations = Vec::new();
        if critical_locations > 0 {
            recommendations.push(Recommendation::DeployCrowdControl { critical_locations });
        }
        if utilization_percent > RESTRICT_ENTRY_PERCENT {
            recommendations.push(Recommendation::RestrictEntry);
        }
        if peak_hour {
            recommendations.push(Recommendation::IncreaseMonitoring);
        }
        if dominant_weather == Some(Weather::Rainy) {
            recommendations.push(Recommendation::PrepareCoveredAreas);
        }

        Self {
            total_people,
            total_capacity,
            utilization_percent,
            safe_locations: count_risk(RiskLevel::Safe),
            warning_locations: count_risk(RiskLevel::Warning),
            critical_locations,
            high_density_locations: count_density(Density::High),
            medium_density_locations: count_density(Density::Medium),
            average_density_score,
            dominant_weather,
            trend,
            critical_alerts: count_severity(active_alerts, AlertSeverity::High),
            warning_alerts: count_severity(active_alerts, AlertSeverity::Medium),
            by_category,
            peak_hour,
            recommendations,
        }
    }
}

fn count_severity(alerts: &[Alert], severity: AlertSeverity) -> usize {
    alerts
        .iter()
        .filter(|alert| alert.is_active() && alert.severity == severity)
        .count()
}

/// Most frequent weather. Weathers are ranked in first-seen order and a tie
/// goes to the one seen later.
fn dominant_weather(weathers: impl Iterator<Item = Weather>) -> Option<Weather> {
    let mut seen: Vec<(Weather, usize)> = Vec::with_capacity(Weather::all().len());
    for weather in weathers {
        match seen.iter_mut().find(|(w, _)| *w == weather) {
            Some((_, count)) => *count += 1,
            None => seen.push((weather, 1)),
        }
    }
    seen.into_iter()
        .reduce(|best, next| if best.1 > next.1 { best } else { next })
        .map(|(weather, _)| weather)
}

fn percent_of(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let rounded = (part * 100 + whole / 2) / whole;
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
