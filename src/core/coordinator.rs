use std::sync::Arc;

use chrono::Timelike;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::alerts::model::{Alert, AlertId};
use super::clock::{Clock, SystemClock};
use super::insights::CrowdInsights;
use super::predictor::{PredictionModel, RuleBasedModel};
use super::simulator::{CrowdSimulator, Snapshot};

pub struct CoordinatorOutput {
    /// False when live updates were off and the tick was skipped
    pub ticked: bool,
    pub new_alerts: Vec<Alert>,
    pub logs: Vec<String>,
}

/// Drives the simulator on the live-update flag.
///
/// A tick requested while live updates are off is dropped, not queued.
pub struct Coordinator<R = ChaCha8Rng, C = SystemClock, M = RuleBasedModel> {
    simulator: CrowdSimulator<R, C, M>,
    live_updates: bool,
    ticks: u64,
}

impl<R: Rng, C: Clock, M: PredictionModel> Coordinator<R, C, M> {
    pub fn new(simulator: CrowdSimulator<R, C, M>, live_updates: bool) -> Self {
        Self {
            simulator,
            live_updates,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) -> CoordinatorOutput {
        let mut logs = Vec::new();

        if !self.live_updates {
            return CoordinatorOutput {
                ticked: false,
                new_alerts: Vec::new(),
                logs,
            };
        }

        let new_alerts = self.simulator.tick();
        self.ticks += 1;

        for alert in &new_alerts {
            logs.push(format!("[{}] {}", alert.id, alert.message));
        }

        CoordinatorOutput {
            ticked: true,
            new_alerts,
            logs,
        }
    }

    pub fn set_live_updates(&mut self, enabled: bool) {
        if self.live_updates != enabled {
            log::info!(
                "Live updates {}",
                if enabled { "resumed" } else { "paused" }
            );
        }
        self.live_updates = enabled;
    }

    pub fn live_updates(&self) -> bool {
        self.live_updates
    }

    /// Number of ticks actually run
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn resolve_alert(&mut self, id: AlertId) -> bool {
        self.simulator.resolve_alert(id)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.simulator.snapshot()
    }

    pub fn active_alerts(&self) -> Vec<Alert> {
        self.simulator.active_alerts()
    }

    pub fn insights(&self) -> CrowdInsights {
        let hour = self.simulator.clock().now().hour();
        CrowdInsights::compute(
            self.simulator.locations(),
            &self.simulator.snapshot(),
            &self.simulator.active_alerts(),
            hour,
        )
    }

    pub fn simulator(&self) -> &CrowdSimulator<R, C, M> {
        &self.simulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::LocationCatalog;
    use crate::core::clock::ManualClock;
    use crate::core::model::{Location, LocationCategory};
    use chrono::NaiveDate;
    use rand::rngs::mock::StepRng;

    fn growing_ghat() -> Coordinator<StepRng, ManualClock> {
        // Saturday evening peak: a ghat at 1000 capacity goes critical on the first tick
        let now = NaiveDate::from_ymd_opt(2028, 4, 15)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let catalog = LocationCatalog::new(vec![Location {
            id: "ghat-1".to_string(),
            name: "Ram Ghat".to_string(),
            category: LocationCategory::Ghat,
            x: 45.0,
            y: 60.0,
            capacity: 1000,
        }])
        .unwrap();
        let mut simulator =
            CrowdSimulator::with_parts(StepRng::new(0, 0), ManualClock::new(now), RuleBasedModel);
        simulator.initialize(&catalog);
        Coordinator::new(simulator, true)
    }

    #[test]
    fn test_coordinator_flow() {
        let mut coord = growing_ghat();

        let output = coord.tick();
        assert!(output.ticked);
        assert_eq!(output.new_alerts.len(), 1);
        assert!(output.logs.iter().any(|m| m.contains("Critical congestion at Ram Ghat")));
        assert_eq!(coord.ticks(), 1);

        let insights = coord.insights();
        assert_eq!(insights.critical_locations, 1);
        assert_eq!(insights.critical_alerts, 1);
        assert!(insights.peak_hour);
    }

    #[test]
    fn test_paused_ticks_are_dropped() {
        let mut coord = growing_ghat();
        let before = coord.snapshot();

        coord.set_live_updates(false);
        for _ in 0..3 {
            let output = coord.tick();
            assert!(!output.ticked);
            assert!(output.new_alerts.is_empty());
        }
        assert_eq!(coord.ticks(), 0);
        assert!(Arc::ptr_eq(&before, &coord.snapshot()));

        // resuming runs exactly one tick per request, with no catch-up
        coord.set_live_updates(true);
        coord.tick();
        assert_eq!(coord.ticks(), 1);
        assert_eq!(coord.snapshot()["ghat-1"].current_count, 1277);
    }

    #[test]
    fn test_resolve_through_coordinator() {
        let mut coord = growing_ghat();
        let alert = coord.tick().new_alerts.remove(0);

        assert!(coord.resolve_alert(alert.id));
        assert!(coord.active_alerts().is_empty());
        assert!(!coord.resolve_alert(alert.id));
        assert_eq!(coord.simulator().alert_history().len(), 1);
    }
}
