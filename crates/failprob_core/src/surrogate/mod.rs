//! Surrogate models fit to sampled (input, loss) pairs
//!
//! Classifiers learn the failure region `{x : g(x) > alpha}` from ±1 labels;
//! regressors learn `g` itself. Every model is fit from a design matrix with
//! one row per sample and queried one input at a time.
//!
//! Fitted models are plain values. The estimators create one, query it, and
//! drop it before returning.

mod forest;
mod kernel_ridge;
mod ols;
mod scaler;
mod svc;

pub use forest::{ForestParams, RandomForest};
pub use kernel_ridge::{KernelRidge, PolynomialKernel};
pub use ols::LinearRegression;
pub use scaler::StandardScaler;
pub use svc::{RbfSvc, ScaledSvc, SvcParams};

use nalgebra::DMatrix;

use crate::error::FitError;

/// A fitted binary classifier over labels `{-1, +1}`
pub trait Classifier {
    fn predict(&self, x: &[f64]) -> i8;
}

/// A fitted scalar regressor
pub trait Regressor {
    fn predict(&self, x: &[f64]) -> f64;
}

/// Copy the rows of a design matrix into contiguous vectors
pub(crate) fn matrix_rows(x: &DMatrix<f64>) -> Vec<Vec<f64>> {
    x.row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

/// Check that a design matrix and its targets agree and are non-empty
pub(crate) fn check_training_set(x: &DMatrix<f64>, targets: usize) -> Result<(), FitError> {
    if x.nrows() == 0 || targets == 0 {
        return Err(FitError::EmptyTrainingSet);
    }
    if x.nrows() != targets {
        return Err(FitError::ShapeMismatch {
            rows: x.nrows(),
            targets,
        });
    }
    Ok(())
}

/// Reject label sets with only one class
pub(crate) fn check_two_classes(y: &[i8]) -> Result<(), FitError> {
    match y.first() {
        None => Err(FitError::EmptyTrainingSet),
        Some(&first) if y.iter().all(|&label| label == first) => {
            Err(FitError::SingleClass { label: first })
        }
        Some(_) => Ok(()),
    }
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}
