//! Tests for running configured experiments
//!
//! These tests verify that:
//! - Probability thresholds resolve through the analytic inverse
//! - A failing estimator is reported in its row without aborting the run
//! - The seed pins down the whole report
//! - Experiment files load from disk

use std::io::Write;

use failprob_core::{EstimatorError, FitError};

use crate::config::{ConfigError, EstimatorData, ExperimentConfig, LossData, ThresholdData};
use crate::experiment::run_experiment;

fn linear_config(threshold: ThresholdData, estimators: Vec<EstimatorData>) -> ExperimentConfig {
    ExperimentConfig {
        seed: 7,
        num_calls: 20_000,
        loss: LossData::Linear { dim: 2 },
        threshold,
        estimators,
    }
}

#[test]
fn test_probability_threshold_matches_reference() {
    let config = linear_config(
        ThresholdData::Probability { value: 0.05 },
        vec![EstimatorData::MonteCarlo, EstimatorData::LinearRegression],
    );
    let report = run_experiment(&config, config.seed).unwrap();

    let reference = report.reference.unwrap();
    assert!((reference - 0.05).abs() < 1e-9, "reference {reference}");

    let mc = report.rows[0].outcome.as_ref().copied().unwrap();
    assert!((mc - 0.05).abs() < 0.01, "monte carlo {mc}");

    let linreg = report.rows[1].outcome.as_ref().copied().unwrap();
    assert!((linreg - 0.05).abs() < 1e-8, "linear regression {linreg}");
}

#[test]
fn test_failed_estimator_does_not_abort() {
    // Nothing in the training box exceeds alpha, so the classifier cannot fit
    let config = linear_config(
        ThresholdData::Alpha { value: 1e6 },
        vec![
            EstimatorData::Svm {
                c: None,
                tolerance: None,
                gamma: None,
            },
            EstimatorData::MonteCarlo,
        ],
    );
    let report = run_experiment(&config, 1).unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(
        report.rows[0].outcome,
        Err(EstimatorError::Fit(FitError::SingleClass { label: -1 }))
    );
    assert_eq!(report.rows[1].outcome, Ok(0.0));
    assert!(report.to_string().contains("SVM        error:"));
}

#[test]
fn test_seed_reproduces_report() {
    let config = ExperimentConfig {
        seed: 3,
        num_calls: 500,
        loss: LossData::Brownian {
            dim: 3,
            interval: 2.0,
        },
        threshold: ThresholdData::Alpha { value: 1.0 },
        estimators: vec![
            EstimatorData::MonteCarlo,
            EstimatorData::RandomForest {
                n_trees: Some(10),
                max_depth: None,
                seed: None,
            },
        ],
    };
    let a = run_experiment(&config, 11).unwrap();
    let b = run_experiment(&config, 11).unwrap();

    assert_eq!(a.reference, None);
    for (left, right) in a.rows.iter().zip(&b.rows) {
        assert_eq!(left.outcome, right.outcome);
    }
}

#[test]
fn test_probability_threshold_rejected_without_inverse() {
    let config = ExperimentConfig {
        seed: 0,
        num_calls: 100,
        loss: LossData::Quadratic { dim: 2 },
        threshold: ThresholdData::Probability { value: 0.01 },
        estimators: vec![],
    };
    assert!(matches!(
        run_experiment(&config, 0),
        Err(ConfigError::NoAnalyticInverse("Quadratic"))
    ));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "seed: 5\nnum_calls: 200\nloss:\n  type: NewBrownian\n  dim: 3\nthreshold:\n  type: Probability\n  value: 0.001\nestimators:\n  - type: MonteCarlo"
    )
    .unwrap();

    let config = ExperimentConfig::load(file.path()).unwrap();
    assert_eq!(config.loss, LossData::NewBrownian { dim: 3 });

    let report = run_experiment(&config, config.seed).unwrap();
    let reference = report.reference.unwrap();
    assert!(
        ((reference - 0.001) / 0.001).abs() < 1e-4,
        "reference {reference}"
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ExperimentConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().starts_with("failed to read"));
}

#[test]
fn test_demo_files_stay_cheap() {
    let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    for name in ["linear.yaml", "brownian.yaml"] {
        let config = ExperimentConfig::load(&demos.join(name)).unwrap();
        // Polynomial regression is cubic in the training budget
        assert!(config.num_calls <= 2000, "{name}: {}", config.num_calls);
        assert!(!config.estimators().is_empty());
    }
}
