use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{LossFunction, check_dim, uniform_unit_vec};
use crate::error::LossError;

/// Linear loss `g(x) = a·x`
///
/// Under a standard normal input `g(X)` is `N(0, ||a||²)`, which makes this
/// family the exact oracle for the sampling estimators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LinearFields", into = "LinearFields")]
pub struct Linear {
    a: Vec<f64>,
}

/// Serialized form, checked by [`Linear::from_coefficients`] on the way in
#[derive(Serialize, Deserialize)]
struct LinearFields {
    a: Vec<f64>,
}

impl TryFrom<LinearFields> for Linear {
    type Error = LossError;

    fn try_from(fields: LinearFields) -> Result<Self, LossError> {
        Linear::from_coefficients(fields.a)
    }
}

impl From<Linear> for LinearFields {
    fn from(model: Linear) -> Self {
        Self { a: model.a }
    }
}

impl Linear {
    /// Draw coefficients uniformly from [0, 1)
    pub fn new<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self, LossError> {
        if n == 0 {
            return Err(LossError::ZeroDimension);
        }
        Ok(Self {
            a: uniform_unit_vec(rng, n),
        })
    }

    /// Build a model from explicit coefficients
    ///
    /// All-zero coefficients are allowed; the loss is then identically zero.
    pub fn from_coefficients(a: Vec<f64>) -> Result<Self, LossError> {
        if a.is_empty() {
            return Err(LossError::ZeroDimension);
        }
        if a.iter().any(|v| !v.is_finite()) {
            return Err(LossError::InvalidCoefficients(
                "linear coefficients must be finite",
            ));
        }
        Ok(Self { a })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.a
    }

    /// Euclidean norm of the coefficient vector
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.a.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

impl LossFunction for Linear {
    fn dim(&self) -> usize {
        self.a.len()
    }

    fn compute(&self, x: &[f64]) -> Result<f64, LossError> {
        check_dim(self.a.len(), x)?;
        Ok(self.a.iter().zip(x).map(|(a, x)| a * x).sum())
    }

    fn name(&self) -> &'static str {
        "Linear"
    }
}

impl fmt::Display for Linear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
