// Occupancy ratio classification.
//
// Thresholds are compared in whole percent with integer arithmetic, so a ratio
// sitting exactly on a boundary always lands in the upper bucket.

use super::model::{Density, Headcount, RiskLevel};

const DENSITY_MEDIUM_PERCENT: u64 = 40;
const DENSITY_HIGH_PERCENT: u64 = 70;
const RISK_WARNING_PERCENT: u64 = 60;
const RISK_CRITICAL_PERCENT: u64 = 85;

/// `count / capacity >= percent / 100`
fn at_least(count: Headcount, capacity: Headcount, percent: u64) -> bool {
    u64::from(count) * 100 >= u64::from(capacity) * percent
}

pub fn classify_density(count: Headcount, capacity: Headcount) -> Density {
    debug_assert!(capacity > 0, "capacity is validated by the catalog");
    if at_least(count, capacity, DENSITY_HIGH_PERCENT) {
        Density::High
    } else if at_least(count, capacity, DENSITY_MEDIUM_PERCENT) {
        Density::Medium
    } else {
        Density::Low
    }
}

pub fn classify_risk(count: Headcount, capacity: Headcount) -> RiskLevel {
    debug_assert!(capacity > 0, "capacity is validated by the catalog");
    if at_least(count, capacity, RISK_CRITICAL_PERCENT) {
        RiskLevel::Critical
    } else if at_least(count, capacity, RISK_WARNING_PERCENT) {
        RiskLevel::Warning
    } else {
        RiskLevel::Safe
    }
}

/// Fraction of capacity in use, for reporting only.
pub fn occupancy_ratio(count: Headcount, capacity: Headcount) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    f64::from(count) / f64::from(capacity)
}
