use nalgebra::{DMatrix, DVector};

use super::{Regressor, check_training_set, dot};
use crate::error::FitError;

/// Singular values below this fraction of the largest are treated as zero
const RANK_EPS: f64 = 1e-12;

/// Ordinary least squares with an intercept
///
/// The intercept is removed by centering, and the coefficients are the
/// minimum-norm least-squares solution on the centered data.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    intercept: f64,
    coef: Vec<f64>,
}

impl LinearRegression {
    pub fn fit(x: &DMatrix<f64>, y: &[f64]) -> Result<Self, FitError> {
        check_training_set(x, y.len())?;
        let rows = x.nrows() as f64;

        let x_mean: Vec<f64> = x.column_iter().map(|col| col.sum() / rows).collect();
        let y_mean = y.iter().sum::<f64>() / rows;

        let mut centered = x.clone();
        for (mut col, mean) in centered.column_iter_mut().zip(&x_mean) {
            col.add_scalar_mut(-mean);
        }
        let target = DVector::from_iterator(y.len(), y.iter().map(|v| v - y_mean));

        let svd = centered.svd(true, true);
        let max_singular = svd.singular_values.max();
        let coef = svd
            .solve(&target, RANK_EPS * max_singular.max(f64::MIN_POSITIVE))
            .map_err(FitError::SingularSystem)?;
        let coef: Vec<f64> = coef.iter().copied().collect();

        let intercept = y_mean - dot(&x_mean, &coef);

        tracing::debug!(intercept, features = coef.len(), "fitted linear regression");

        Ok(Self { intercept, coef })
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coef
    }

    /// Euclidean norm of the slope coefficients
    pub fn coef_norm(&self) -> f64 {
        dot(&self.coef, &self.coef).sqrt()
    }
}

impl Regressor for LinearRegression {
    fn predict(&self, x: &[f64]) -> f64 {
        self.intercept + dot(&self.coef, x)
    }
}
