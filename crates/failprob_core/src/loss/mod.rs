//! Random loss functions
//!
//! Each loss model is one fixed realization of a random scalar objective:
//! its coefficients are drawn once from the generator handed to the
//! constructor and never change afterwards. Evaluating a model is pure.
//!
//! Four families are provided:
//! - [`Linear`]: `a·x`
//! - [`Quadratic`]: `a·x + xᵀ b x`
//! - [`Brownian`]: running maximum of a discretized Brownian path driven by `x`
//! - [`NewBrownian`]: `max_i sigma_i · x_i`

mod brownian;
mod linear;
mod new_brownian;
mod quadratic;

use std::fmt;

pub use brownian::Brownian;
pub use linear::Linear;
pub use new_brownian::NewBrownian;
pub use quadratic::Quadratic;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LossError;

/// A deterministic scalar function of an `n`-dimensional input
pub trait LossFunction {
    /// Input dimension `n`
    fn dim(&self) -> usize;

    /// Evaluate the loss at `x`.
    ///
    /// Fails with [`LossError::DimensionMismatch`] when `x.len() != self.dim()`.
    fn compute(&self, x: &[f64]) -> Result<f64, LossError>;

    /// Display name used in reports
    fn name(&self) -> &'static str;
}

/// Reject inputs whose length differs from the model dimension
#[inline]
pub(crate) fn check_dim(expected: usize, x: &[f64]) -> Result<(), LossError> {
    if x.len() == expected {
        Ok(())
    } else {
        Err(LossError::DimensionMismatch {
            expected,
            actual: x.len(),
        })
    }
}

/// Draw `n` independent uniform [0, 1) values
pub(crate) fn uniform_unit_vec<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.random::<f64>()).collect()
}

/// Tagged union over the loss families
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LossModel {
    Linear(Linear),
    Quadratic(Quadratic),
    Brownian(Brownian),
    NewBrownian(NewBrownian),
}

impl LossFunction for LossModel {
    fn dim(&self) -> usize {
        match self {
            LossModel::Linear(m) => m.dim(),
            LossModel::Quadratic(m) => m.dim(),
            LossModel::Brownian(m) => m.dim(),
            LossModel::NewBrownian(m) => m.dim(),
        }
    }

    fn compute(&self, x: &[f64]) -> Result<f64, LossError> {
        match self {
            LossModel::Linear(m) => m.compute(x),
            LossModel::Quadratic(m) => m.compute(x),
            LossModel::Brownian(m) => m.compute(x),
            LossModel::NewBrownian(m) => m.compute(x),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LossModel::Linear(m) => m.name(),
            LossModel::Quadratic(m) => m.name(),
            LossModel::Brownian(m) => m.name(),
            LossModel::NewBrownian(m) => m.name(),
        }
    }
}

impl fmt::Display for LossModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Linear> for LossModel {
    fn from(model: Linear) -> Self {
        LossModel::Linear(model)
    }
}

impl From<Quadratic> for LossModel {
    fn from(model: Quadratic) -> Self {
        LossModel::Quadratic(model)
    }
}

impl From<Brownian> for LossModel {
    fn from(model: Brownian) -> Self {
        LossModel::Brownian(model)
    }
}

impl From<NewBrownian> for LossModel {
    fn from(model: NewBrownian) -> Self {
        LossModel::NewBrownian(model)
    }
}
