//! Experiment configuration
//!
//! YAML-friendly mirrors of the library types. Every optional field falls back
//! to the library default, so a minimal file names only the loss family, its
//! dimension and the threshold.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use failprob_core::estimators::{Estimator, ForestParams, PolyRegParams, SvcParams};
use failprob_core::estimators::{lin_alpha, new_brown_alpha};
use failprob_core::loss::{Brownian, Linear, LossModel, NewBrownian, Quadratic};
use failprob_core::{EstimatorError, LossError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_num_calls() -> usize {
    1000
}

fn default_interval() -> f64 {
    1.0
}

/// A complete experiment: one loss realization, one threshold, several estimators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Seed for the loss realization and every estimator's sampling
    #[serde(default)]
    pub seed: u64,
    /// Loss evaluations granted to each estimator
    #[serde(default = "default_num_calls")]
    pub num_calls: usize,
    pub loss: LossData,
    pub threshold: ThresholdData,
    /// Estimators to run in order; empty runs all of them with defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub estimators: Vec<EstimatorData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LossData {
    Linear {
        dim: usize,
    },
    Quadratic {
        dim: usize,
    },
    Brownian {
        dim: usize,
        #[serde(default = "default_interval")]
        interval: f64,
    },
    NewBrownian {
        dim: usize,
    },
}

/// How the failure threshold is specified
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ThresholdData {
    /// Use `value` as alpha directly
    Alpha { value: f64 },
    /// Pick the alpha whose analytic failure probability is `value`
    Probability { value: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum EstimatorData {
    MonteCarlo,
    Svm {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        c: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gamma: Option<f64>,
    },
    RandomForest {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        n_trees: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_depth: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    LinearRegression,
    PolynomialRegression {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        degree: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        regularization: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        samples: Option<usize>,
    },
}

/// Errors turning a parsed configuration into runnable parts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid loss model: {0}")]
    Loss(#[from] LossError),
    #[error("invalid threshold: {0}")]
    Threshold(EstimatorError),
    /// Probability thresholds need an analytic inverse
    #[error("{0} loss has no analytic inverse, use an Alpha threshold")]
    NoAnalyticInverse(&'static str),
}

impl ExperimentConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Read and parse an experiment file
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&yaml).wrap_err_with(|| format!("failed to parse {}", path.display()))
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Configured estimators, or every estimator when none are listed
    pub fn estimators(&self) -> Vec<Estimator> {
        if self.estimators.is_empty() {
            Estimator::all()
        } else {
            self.estimators.iter().map(EstimatorData::to_estimator).collect()
        }
    }
}

impl LossData {
    /// Draw a loss realization from `rng`
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<LossModel, LossError> {
        Ok(match self {
            LossData::Linear { dim } => Linear::new(*dim, rng)?.into(),
            LossData::Quadratic { dim } => Quadratic::new(*dim, rng)?.into(),
            LossData::Brownian { dim, interval } => Brownian::new(*dim, *interval, rng)?.into(),
            LossData::NewBrownian { dim } => NewBrownian::new(*dim, rng)?.into(),
        })
    }
}

impl ThresholdData {
    /// Resolve the threshold to an alpha for a concrete model
    pub fn resolve(&self, model: &LossModel) -> Result<f64, ConfigError> {
        match (self, model) {
            (ThresholdData::Alpha { value }, _) => Ok(*value),
            (ThresholdData::Probability { value }, LossModel::Linear(m)) => {
                lin_alpha(m, *value).map_err(ConfigError::Threshold)
            }
            (ThresholdData::Probability { value }, LossModel::NewBrownian(m)) => {
                new_brown_alpha(m, *value).map_err(ConfigError::Threshold)
            }
            (ThresholdData::Probability { .. }, LossModel::Quadratic(_)) => {
                Err(ConfigError::NoAnalyticInverse("Quadratic"))
            }
            (ThresholdData::Probability { .. }, LossModel::Brownian(_)) => {
                Err(ConfigError::NoAnalyticInverse("Brownian"))
            }
        }
    }
}

impl EstimatorData {
    pub fn to_estimator(&self) -> Estimator {
        match *self {
            EstimatorData::MonteCarlo => Estimator::MonteCarlo,
            EstimatorData::Svm {
                c,
                tolerance,
                gamma,
            } => {
                let defaults = SvcParams::default();
                Estimator::Svm(SvcParams {
                    c: c.unwrap_or(defaults.c),
                    tolerance: tolerance.unwrap_or(defaults.tolerance),
                    gamma: gamma.or(defaults.gamma),
                })
            }
            EstimatorData::RandomForest {
                n_trees,
                max_depth,
                seed,
            } => {
                let defaults = ForestParams::default();
                Estimator::RandomForest(ForestParams {
                    n_trees: n_trees.unwrap_or(defaults.n_trees),
                    max_depth: max_depth.unwrap_or(defaults.max_depth),
                    seed: seed.unwrap_or(defaults.seed),
                })
            }
            EstimatorData::LinearRegression => Estimator::LinearRegression,
            EstimatorData::PolynomialRegression {
                degree,
                regularization,
                samples,
            } => {
                let defaults = PolyRegParams::default();
                Estimator::PolynomialRegression(PolyRegParams {
                    degree: degree.unwrap_or(defaults.degree),
                    regularization: regularization.unwrap_or(defaults.regularization),
                    samples: samples.unwrap_or(defaults.samples),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const FULL: &str = r#"
seed: 7
num_calls: 5000
loss:
  type: Linear
  dim: 2
threshold:
  type: Alpha
  value: 2.0
estimators:
  - type: MonteCarlo
  - type: Svm
  - type: RandomForest
    max_depth: 3
  - type: LinearRegression
  - type: PolynomialRegression
    degree: 2
    regularization: 0.001
    samples: 500
"#;

    #[test]
    fn test_parse_full_config() {
        let config = ExperimentConfig::from_yaml(FULL).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.num_calls, 5000);
        assert_eq!(config.loss, LossData::Linear { dim: 2 });
        assert_eq!(config.threshold, ThresholdData::Alpha { value: 2.0 });

        let estimators = config.estimators();
        assert_eq!(estimators.len(), 5);
        assert_eq!(estimators[1], Estimator::Svm(SvcParams::default()));
        assert_eq!(
            estimators[2],
            Estimator::RandomForest(ForestParams {
                max_depth: 3,
                ..Default::default()
            })
        );
        assert_eq!(
            estimators[4],
            Estimator::PolynomialRegression(PolyRegParams {
                degree: 2,
                regularization: 0.001,
                samples: 500,
            })
        );
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
loss:
  type: Brownian
  dim: 4
threshold:
  type: Probability
  value: 0.01
"#;
        let config = ExperimentConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.seed, 0);
        assert_eq!(config.num_calls, 1000);
        assert_eq!(
            config.loss,
            LossData::Brownian {
                dim: 4,
                interval: 1.0
            }
        );
        assert_eq!(config.estimators(), Estimator::all());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ExperimentConfig::from_yaml(FULL).unwrap();
        let yaml = config.to_yaml().unwrap();
        let reparsed = ExperimentConfig::from_yaml(&yaml).unwrap();
        assert_eq!(reparsed.estimators(), config.estimators());
        assert_eq!(reparsed.loss, config.loss);
    }

    #[test]
    fn test_probability_threshold_resolution() {
        let mut rng = SmallRng::seed_from_u64(3);
        let threshold = ThresholdData::Probability { value: 0.05 };

        let linear = LossData::Linear { dim: 3 }.build(&mut rng).unwrap();
        let alpha = threshold.resolve(&linear).unwrap();
        let LossModel::Linear(m) = &linear else {
            unreachable!()
        };
        assert!((failprob_core::estimators::lin_pf(m, alpha) - 0.05).abs() < 1e-9);

        let quadratic = LossData::Quadratic { dim: 3 }.build(&mut rng).unwrap();
        assert!(matches!(
            threshold.resolve(&quadratic),
            Err(ConfigError::NoAnalyticInverse("Quadratic"))
        ));
    }

    #[test]
    fn test_invalid_probability_threshold() {
        let mut rng = SmallRng::seed_from_u64(3);
        let model = LossData::NewBrownian { dim: 2 }.build(&mut rng).unwrap();
        let err = ThresholdData::Probability { value: 2.0 }
            .resolve(&model)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Threshold(EstimatorError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_zero_dimension_fails_to_build() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            LossData::Linear { dim: 0 }.build(&mut rng),
            Err(LossError::ZeroDimension)
        ));
    }
}
