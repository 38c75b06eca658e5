// Live crowd simulation.
//
// CrowdSimulator owns the per-location readings and the alert engine.
// Readers get the snapshot as a shared `Arc`: a tick builds a whole new map and
// swaps it in at the end, so a held snapshot is always either entirely
// pre-tick or entirely post-tick.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Timelike;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::alerts::engine::AlertEngine;
use super::alerts::model::{Alert, AlertId};
use super::catalog::LocationCatalog;
use super::clock::{Clock, SystemClock};
use super::environment::{draw_day_type, draw_weather, floor_count, OccupancyProfile};
use super::model::{CrowdReading, Location, LocationId};
use super::predictor::{PredictionFeatures, PredictionModel, RuleBasedModel};

pub type Snapshot = HashMap<LocationId, CrowdReading>;

/// Bounds of the noise applied on top of each tick's prediction
const TICK_JITTER_LOW: f64 = 0.9;
const TICK_JITTER_HIGH: f64 = 1.1;

pub struct CrowdSimulator<R = ChaCha8Rng, C = SystemClock, M = RuleBasedModel> {
    /// Locations in catalog order
    locations: Vec<Location>,
    snapshot: Arc<Snapshot>,
    alerts: AlertEngine,
    model: M,
    rng: R,
    clock: C,
}

impl CrowdSimulator {
    /// Deterministic simulator on the system clock
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(ChaCha8Rng::seed_from_u64(seed), SystemClock, RuleBasedModel)
    }

    pub fn from_entropy() -> Self {
        Self::with_parts(ChaCha8Rng::from_entropy(), SystemClock, RuleBasedModel)
    }
}

impl<R: Rng, C: Clock, M: PredictionModel> CrowdSimulator<R, C, M> {
    pub fn with_parts(rng: R, clock: C, model: M) -> Self {
        Self {
            locations: Vec::new(),
            snapshot: Arc::new(Snapshot::new()),
            alerts: AlertEngine::new(),
            model,
            rng,
            clock,
        }
    }

    /// Seed one reading per catalog location from the live baseline recipe.
    ///
    /// Calling this again replaces the locations and readings; alerts raised so
    /// far are kept.
    pub fn initialize(&mut self, catalog: &LocationCatalog) {
        let now = self.clock.now();
        let hour = now.hour();

        let mut snapshot = Snapshot::with_capacity(catalog.len());
        for location in catalog {
            let count = OccupancyProfile::LIVE.sample(location, hour, &mut self.rng);
            let weather = draw_weather(&mut self.rng);
            let day_type = draw_day_type(now.date(), &mut self.rng);
            let reading = CrowdReading::classified(location, now, count, count, weather, day_type);
            snapshot.insert(location.id.clone(), reading);
        }

        self.locations = catalog.locations().to_vec();
        self.snapshot = Arc::new(snapshot);
        log::info!(
            "Initialized {} locations at {}",
            self.locations.len(),
            now.format("%Y-%m-%d %H:%M")
        );
    }

    /// Advance every location by one step and evaluate alerts.
    /// Returns the alerts raised during this tick.
    pub fn tick(&mut self) -> Vec<Alert> {
        let now = self.clock.now();
        let hour = now.hour();

        let mut next = Snapshot::with_capacity(self.locations.len());
        let mut raised = Vec::new();

        for location in &self.locations {
            let Some(current) = self.snapshot.get(&location.id) else {
                continue;
            };

            let prediction = self.model.predict(&PredictionFeatures {
                hour,
                location_id: &location.id,
                weather: current.weather,
                day_type: current.day_type,
                historical_average: current.current_count,
            });
            let jitter = self.rng.gen_range(TICK_JITTER_LOW..=TICK_JITTER_HIGH);
            let current_count = floor_count(f64::from(prediction.predicted_count) * jitter);

            let reading = CrowdReading::classified(
                location,
                now,
                current_count,
                prediction.predicted_count,
                current.weather,
                current.day_type,
            );
            raised.extend(self.alerts.evaluate(location, &reading));
            next.insert(location.id.clone(), reading);
        }

        self.snapshot = Arc::new(next);
        log::debug!(
            "Tick at {}: {} locations, {} new alerts",
            now.format("%H:%M:%S"),
            self.locations.len(),
            raised.len()
        );
        raised
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn reading(&self, location_id: &str) -> Option<&CrowdReading> {
        self.snapshot.get(location_id)
    }

    /// Unresolved alerts in creation order
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.alerts.active()
    }

    /// Every alert raised so far, resolved ones included
    pub fn alert_history(&self) -> &[Alert] {
        self.alerts.history()
    }

    pub fn alert(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.get(id)
    }

    /// Operator acknowledgement. Unknown or already resolved ids are a no-op.
    pub fn resolve_alert(&mut self, id: AlertId) -> bool {
        self.alerts.resolve(id)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
