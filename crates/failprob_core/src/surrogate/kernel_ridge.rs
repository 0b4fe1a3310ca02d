use nalgebra::{DMatrix, DVector};

use super::{Regressor, check_training_set, dot, matrix_rows};
use crate::error::FitError;

/// Polynomial kernel `k(x, y) = (gamma·<x, y> + coef0)^degree`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialKernel {
    pub degree: u32,
    pub gamma: f64,
    pub coef0: f64,
}

impl PolynomialKernel {
    /// Kernel with `gamma = 1 / n_features` and `coef0 = 1`
    pub fn with_default_scale(degree: u32, n_features: usize) -> Self {
        Self {
            degree,
            gamma: 1.0 / n_features as f64,
            coef0: 1.0,
        }
    }

    #[inline]
    pub fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        (self.gamma * dot(a, b) + self.coef0).powi(self.degree as i32)
    }
}

/// Kernel ridge regression
///
/// Dual coefficients solve `(K + λI) c = y`; predictions are `Σ c_i k(x_i, x)`.
/// No intercept is fitted.
/// Fitting factors the full Gram matrix: cubic time and quadratic memory in
/// the number of training points.
#[derive(Debug, Clone)]
pub struct KernelRidge {
    train: Vec<Vec<f64>>,
    dual_coef: Vec<f64>,
    kernel: PolynomialKernel,
}

impl KernelRidge {
    pub fn fit(
        x: &DMatrix<f64>,
        y: &[f64],
        kernel: PolynomialKernel,
        regularization: f64,
    ) -> Result<Self, FitError> {
        check_training_set(x, y.len())?;
        if !regularization.is_finite() || regularization < 0.0 {
            return Err(FitError::InvalidHyperparameter {
                name: "regularization",
                value: regularization,
            });
        }

        let train = matrix_rows(x);
        let l = train.len();
        let mut gram = DMatrix::from_fn(l, l, |i, j| kernel.eval(&train[i], &train[j]));
        for i in 0..l {
            gram[(i, i)] += regularization;
        }
        let target = DVector::from_column_slice(y);

        let dual = match gram.clone().cholesky() {
            Some(chol) => chol.solve(&target),
            None => {
                tracing::warn!("kernel matrix is not positive definite, using least squares");
                gram.svd(true, true)
                    .solve(&target, 1e-12)
                    .map_err(FitError::SingularSystem)?
            }
        };

        tracing::debug!(
            samples = l,
            degree = kernel.degree,
            regularization,
            "fitted kernel ridge"
        );

        Ok(Self {
            train,
            dual_coef: dual.iter().copied().collect(),
            kernel,
        })
    }

    pub fn kernel(&self) -> &PolynomialKernel {
        &self.kernel
    }
}

impl Regressor for KernelRidge {
    fn predict(&self, x: &[f64]) -> f64 {
        self.train
            .iter()
            .zip(&self.dual_coef)
            .map(|(xi, c)| c * self.kernel.eval(xi, x))
            .sum()
    }
}
