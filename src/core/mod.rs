pub mod alerts;
pub mod catalog;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod environment;
pub mod error;
pub mod history;
pub mod insights;
pub mod model;
pub mod predictor;
pub mod simulator;

#[cfg(test)]
mod sim_test;
