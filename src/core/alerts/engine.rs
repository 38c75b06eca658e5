// Alert engine - evaluates triggers and owns the alert store.
//
// Alerts are never deleted. An open alert blocks further alerts of the same type
// for the same location until an operator resolves it; resolving never happens
// automatically, even once the location drops back to safe.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::model::{Alert, AlertId, AlertSeverity, AlertType};
use super::triggers::{evaluate_trigger, TriggerContext};
use crate::core::model::{CrowdReading, Location, LocationId};

/// Alert engine state
#[derive(Debug, Default)]
pub struct AlertEngine {
    /// Every alert ever raised, in creation order
    alerts: Vec<Alert>,
    /// Open alerts by location and type, as indices into `alerts`
    open: HashMap<LocationId, HashMap<AlertType, usize>>,
    /// Position of each alert in `alerts`
    by_id: HashMap<AlertId, usize>,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an unresolved alert of `alert_type` exists for the location.
    pub fn has_active(&self, location_id: &str, alert_type: AlertType) -> bool {
        self.open
            .get(location_id)
            .is_some_and(|types| types.contains_key(&alert_type))
    }

    /// Evaluate all triggers against a location's new reading.
    /// Returns the alerts raised, at most one per type.
    pub fn evaluate(&mut self, location: &Location, reading: &CrowdReading) -> Vec<Alert> {
        let ctx = TriggerContext { location, reading };
        let mut raised = Vec::new();

        for alert_type in AlertType::all() {
            if self.has_active(&location.id, *alert_type) {
                continue;
            }
            if let Some(outcome) = evaluate_trigger(*alert_type, &ctx) {
                let alert = self.raise(
                    &location.id,
                    *alert_type,
                    outcome.severity,
                    outcome.message,
                    reading.timestamp,
                );
                raised.push(alert);
            }
        }

        raised
    }

    fn raise(
        &mut self,
        location_id: &str,
        alert_type: AlertType,
        severity: AlertSeverity,
        message: String,
        timestamp: NaiveDateTime,
    ) -> Alert {
        // alerts are never removed, so the count is a unique sequence
        let id = AlertId(self.alerts.len() as u64 + 1);

        let alert = Alert {
            id,
            location_id: location_id.to_string(),
            alert_type,
            severity,
            message,
            timestamp,
            resolved: false,
        };
        log::info!("Raised {} ({:?}): {}", id, alert_type, alert.message);

        let index = self.alerts.len();
        self.alerts.push(alert.clone());
        self.by_id.insert(id, index);
        self.open
            .entry(location_id.to_string())
            .or_default()
            .insert(alert_type, index);
        alert
    }

    /// Mark an alert resolved. Unknown or already resolved ids are ignored.
    /// Returns true if the alert changed state.
    pub fn resolve(&mut self, id: AlertId) -> bool {
        let Some(&index) = self.by_id.get(&id) else {
            log::debug!("Ignoring resolve for unknown {}", id);
            return false;
        };
        let alert = &mut self.alerts[index];
        if alert.resolved {
            return false;
        }
        alert.resolved = true;

        if let Some(types) = self.open.get_mut(&alert.location_id) {
            types.remove(&alert.alert_type);
            if types.is_empty() {
                self.open.remove(&alert.location_id);
            }
        }
        log::info!("Resolved {} at {}", id, alert.location_id);
        true
    }

    /// Unresolved alerts in creation order
    pub fn active(&self) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|alert| alert.is_active())
            .cloned()
            .collect()
    }

    /// Every alert ever raised, resolved ones included
    pub fn history(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.by_id.get(&id).map(|&index| &self.alerts[index])
    }
}
