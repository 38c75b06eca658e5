// Alert system for location risk conditions.
//
// Architecture:
// - model.rs: Alert records, ids, types and severities
// - triggers.rs: Per-type trigger evaluation against a fresh reading
// - engine.rs: Alert store, dedup index and the resolve transition

pub mod engine;
pub mod model;
pub mod triggers;
