// Trigger evaluation for alert types.
//
// Each trigger inspects a location's freshly computed reading and returns the
// severity and message of the alert to raise, if any. Deduplication against
// already-open alerts is the engine's job, not the trigger's.

use super::model::{AlertSeverity, AlertType};
use crate::core::model::{CrowdReading, Location, RiskLevel};

/// Context provided to triggers for evaluation
pub struct TriggerContext<'a> {
    pub location: &'a Location,
    /// Reading produced by the current tick
    pub reading: &'a CrowdReading,
}

/// What a trigger asks the engine to raise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub severity: AlertSeverity,
    pub message: String,
}

/// Evaluate a specific trigger against the current context.
/// Returns Some(outcome) if the trigger fired, None otherwise.
pub fn evaluate_trigger(alert_type: AlertType, ctx: &TriggerContext) -> Option<TriggerOutcome> {
    match alert_type {
        AlertType::Congestion => evaluate_congestion(ctx),
        AlertType::Emergency | AlertType::Weather => None,
    }
}

/// Fires while the location is at critical risk.
fn evaluate_congestion(ctx: &TriggerContext) -> Option<TriggerOutcome> {
    if ctx.reading.risk_level != RiskLevel::Critical {
        return None;
    }
    Some(TriggerOutcome {
        severity: AlertSeverity::High,
        message: format!(
            "Critical congestion at {}. Immediate action required.",
            ctx.location.name
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{DayType, LocationCategory, Weather};
    use chrono::NaiveDate;

    fn gate() -> Location {
        Location {
            id: "gate-2".to_string(),
            name: "North Gate".to_string(),
            category: LocationCategory::EntryGate,
            x: 50.0,
            y: 15.0,
            capacity: 6000,
        }
    }

    fn reading_for(location: &Location, count: u32) -> CrowdReading {
        let timestamp = NaiveDate::from_ymd_opt(2028, 4, 10)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        CrowdReading::classified(location, timestamp, count, count, Weather::Sunny, DayType::Normal)
    }

    #[test]
    fn test_congestion_fires_on_critical() {
        let location = gate();
        let reading = reading_for(&location, 5400);
        let ctx = TriggerContext {
            location: &location,
            reading: &reading,
        };
        let outcome = evaluate_trigger(AlertType::Congestion, &ctx).unwrap();
        assert_eq!(outcome.severity, AlertSeverity::High);
        assert_eq!(
            outcome.message,
            "Critical congestion at North Gate. Immediate action required."
        );
    }

    #[test]
    fn test_congestion_silent_below_critical() {
        let location = gate();
        // 5099 / 6000 is just under 0.85
        let reading = reading_for(&location, 5099);
        let ctx = TriggerContext {
            location: &location,
            reading: &reading,
        };
        assert!(evaluate_trigger(AlertType::Congestion, &ctx).is_none());
    }

    #[test]
    fn test_reserved_types_never_fire() {
        let location = gate();
        let reading = reading_for(&location, 6000);
        let ctx = TriggerContext {
            location: &location,
            reading: &reading,
        };
        assert!(evaluate_trigger(AlertType::Emergency, &ctx).is_none());
        assert!(evaluate_trigger(AlertType::Weather, &ctx).is_none());
    }
}
