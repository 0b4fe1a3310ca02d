//! Probability-of-failure estimators
//!
//! Every estimator answers the same question, `P(g(X) > alpha)` for standard
//! normal `X`, with a different trade-off:
//!
//! - [`mc`]: direct Monte Carlo, unbiased but blind to very rare events
//! - [`svm`], [`rf`]: classify the failure region from a uniform training sample
//! - [`linreg`], [`polyreg`]: regress the loss itself, then threshold
//! - [`analytic`]: closed forms for the Linear and New Brownian families,
//!   used as validation oracles
//!
//! # Example
//!
//! ```ignore
//! use failprob_core::estimators::{Estimator, mc};
//! use failprob_core::loss::Linear;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let model = Linear::new(4, &mut rng)?;
//! let direct = mc(&model, 100_000, 1.5, &mut rng)?;
//! let forest = Estimator::RandomForest(Default::default()).estimate(&model, 5_000, 1.5, &mut rng)?;
//! ```

pub mod analytic;
mod monte_carlo;
mod surrogate;

pub use analytic::{analytic_reference, lin_alpha, lin_pf, new_brown_alpha, new_brown_pf};
pub use monte_carlo::mc;
pub use surrogate::{PolyRegParams, linreg, polyreg, rf, svm, svm_with};

pub use crate::surrogate::{ForestParams, SvcParams};

use rand::Rng;

use crate::error::{EstimatorError, Result};
use crate::loss::LossFunction;

/// Reject an empty sample budget
pub(crate) fn require_samples(parameter: &'static str, count: usize) -> Result<()> {
    if count == 0 {
        Err(EstimatorError::ZeroSamples { parameter })
    } else {
        Ok(())
    }
}

/// A sampling-based estimator together with its settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimator {
    MonteCarlo,
    Svm(SvcParams),
    RandomForest(ForestParams),
    LinearRegression,
    PolynomialRegression(PolyRegParams),
}

impl Estimator {
    /// Every estimator with default settings
    #[must_use]
    pub fn all() -> Vec<Estimator> {
        vec![
            Estimator::MonteCarlo,
            Estimator::Svm(SvcParams::default()),
            Estimator::RandomForest(ForestParams::default()),
            Estimator::LinearRegression,
            Estimator::PolynomialRegression(PolyRegParams::default()),
        ]
    }

    /// Short label for reports
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Estimator::MonteCarlo => "MC",
            Estimator::Svm(_) => "SVM",
            Estimator::RandomForest(_) => "RF",
            Estimator::LinearRegression => "LinReg",
            Estimator::PolynomialRegression(_) => "PolyReg",
        }
    }

    /// Estimate `P(g(X) > alpha)` with a budget of `num_calls` loss evaluations
    pub fn estimate<L, R>(&self, model: &L, num_calls: usize, alpha: f64, rng: &mut R) -> Result<f64>
    where
        L: LossFunction + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Estimator::MonteCarlo => mc(model, num_calls, alpha, rng),
            Estimator::Svm(params) => svm_with(model, num_calls, alpha, params, rng),
            Estimator::RandomForest(params) => rf(model, num_calls, alpha, params, rng),
            Estimator::LinearRegression => linreg(model, num_calls, alpha, rng),
            Estimator::PolynomialRegression(params) => polyreg(model, num_calls, alpha, params, rng),
        }
    }
}
