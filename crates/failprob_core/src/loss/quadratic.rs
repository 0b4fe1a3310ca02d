use std::fmt;

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{LossFunction, check_dim, uniform_unit_vec};
use crate::error::LossError;

/// Quadratic loss `g(x) = a·x + xᵀ b x`
///
/// `a` and every entry of `b` are drawn uniformly from [0, 1). The matrix is
/// not symmetrized; only its symmetric part contributes to the quadratic form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuadraticFields", into = "QuadraticFields")]
pub struct Quadratic {
    a: Vec<f64>,
    b: DMatrix<f64>,
}

#[derive(Serialize, Deserialize)]
struct QuadraticFields {
    a: Vec<f64>,
    b: DMatrix<f64>,
}

impl TryFrom<QuadraticFields> for Quadratic {
    type Error = LossError;

    fn try_from(fields: QuadraticFields) -> Result<Self, LossError> {
        Quadratic::from_parts(fields.a, fields.b)
    }
}

impl From<Quadratic> for QuadraticFields {
    fn from(model: Quadratic) -> Self {
        Self {
            a: model.a,
            b: model.b,
        }
    }
}

impl Quadratic {
    pub fn new<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self, LossError> {
        if n == 0 {
            return Err(LossError::ZeroDimension);
        }
        let a = uniform_unit_vec(rng, n);
        let b = DMatrix::from_row_iterator(n, n, (0..n * n).map(|_| rng.random::<f64>()));
        Ok(Self { a, b })
    }

    /// Build a model from an explicit linear part and an `n × n` matrix
    pub fn from_parts(a: Vec<f64>, b: DMatrix<f64>) -> Result<Self, LossError> {
        if a.is_empty() {
            return Err(LossError::ZeroDimension);
        }
        if b.nrows() != a.len() || b.ncols() != a.len() {
            return Err(LossError::InvalidCoefficients(
                "quadratic matrix must be square and match the linear part",
            ));
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(LossError::InvalidCoefficients(
                "quadratic coefficients must be finite",
            ));
        }
        Ok(Self { a, b })
    }

    pub fn linear_part(&self) -> &[f64] {
        &self.a
    }

    pub fn quadratic_part(&self) -> &DMatrix<f64> {
        &self.b
    }
}

impl LossFunction for Quadratic {
    fn dim(&self) -> usize {
        self.a.len()
    }

    fn compute(&self, x: &[f64]) -> Result<f64, LossError> {
        check_dim(self.a.len(), x)?;
        let xv = DVector::from_column_slice(x);
        let linear: f64 = self.a.iter().zip(x).map(|(a, x)| a * x).sum();
        let quadratic = xv.dot(&(&self.b * &xv));
        Ok(linear + quadratic)
    }

    fn name(&self) -> &'static str {
        "Quadratic"
    }
}

impl fmt::Display for Quadratic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
