//! Command-line front end for probability-of-failure experiments
//!
//! An experiment file names a loss family, a threshold and a list of
//! estimators. Running it prints each estimate next to the analytic
//! reference when the loss family has one.

pub mod config;
pub mod experiment;
pub mod logging;
pub mod report;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, ExperimentConfig};
pub use experiment::run_experiment;
pub use logging::init_logging;
pub use report::{EstimateRow, Report};
