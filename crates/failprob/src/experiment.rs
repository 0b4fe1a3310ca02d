//! Run one configured experiment
//!
//! A single seeded generator draws the loss realization and then feeds every
//! estimator in turn, so a seed pins down the whole report.

use std::time::Instant;

use failprob_core::estimators::analytic_reference;
use failprob_core::{LossFunction, Result as EstimateResult};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{ConfigError, ExperimentConfig};
use crate::report::{EstimateRow, Report};

/// Build the model, resolve the threshold, and run every configured estimator.
///
/// Estimator failures are recorded in their rows; only configuration
/// problems abort the run.
pub fn run_experiment(config: &ExperimentConfig, seed: u64) -> Result<Report, ConfigError> {
    let mut rng = SmallRng::seed_from_u64(seed);

    let model = config.loss.build(&mut rng)?;
    let alpha = config.threshold.resolve(&model)?;
    let reference = analytic_reference(&model, alpha);

    tracing::info!(
        model = model.name(),
        dim = model.dim(),
        alpha,
        ?reference,
        seed,
        "starting experiment"
    );

    let rows = config
        .estimators()
        .into_iter()
        .map(|estimator| {
            let start = Instant::now();
            let outcome: EstimateResult<f64> =
                estimator.estimate(&model, config.num_calls, alpha, &mut rng);
            let elapsed = start.elapsed();

            match &outcome {
                Ok(pf) => tracing::info!(
                    estimator = estimator.label(),
                    pf,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "estimate complete"
                ),
                Err(err) => tracing::warn!(
                    estimator = estimator.label(),
                    %err,
                    "estimator failed"
                ),
            }

            EstimateRow {
                label: estimator.label(),
                outcome,
                elapsed,
            }
        })
        .collect();

    Ok(Report {
        model: model.name(),
        dim: model.dim(),
        seed,
        num_calls: config.num_calls,
        alpha,
        reference,
        rows,
    })
}
