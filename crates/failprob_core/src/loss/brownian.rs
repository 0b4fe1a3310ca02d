use std::fmt;

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{LossFunction, check_dim};
use crate::error::LossError;

/// Running maximum of a Brownian path sampled at random times
///
/// The path is observed at `n` increments over `[0, interval]`. With
/// standard normal `x`, `(b·x)[k]` is the path value at `t[k + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BrownianFields", into = "BrownianFields")]
pub struct Brownian {
    /// `n + 1` time points, `t[0] = 0` and `t[n] = interval`
    t: Vec<f64>,
    /// Lower-triangular increment matrix, `b[(row, col)] = sqrt(t[col + 1] - t[col])`
    b: DMatrix<f64>,
}

/// Serialized form; the increment matrix is rebuilt from the time grid
#[derive(Serialize, Deserialize)]
struct BrownianFields {
    t: Vec<f64>,
}

impl TryFrom<BrownianFields> for Brownian {
    type Error = LossError;

    fn try_from(fields: BrownianFields) -> Result<Self, LossError> {
        Brownian::from_times(fields.t)
    }
}

impl From<Brownian> for BrownianFields {
    fn from(model: Brownian) -> Self {
        Self { t: model.t }
    }
}

impl Brownian {
    /// Draw the intermediate time points.
    ///
    /// Each point is uniform between the previous point and `interval`; the
    /// sequence is used as drawn.
    pub fn new<R: Rng + ?Sized>(n: usize, interval: f64, rng: &mut R) -> Result<Self, LossError> {
        if n == 0 {
            return Err(LossError::ZeroDimension);
        }
        if !interval.is_finite() || interval <= 0.0 {
            return Err(LossError::InvalidInterval(interval));
        }

        let mut t = Vec::with_capacity(n + 1);
        t.push(0.0);
        while t.len() < n {
            let last = t[t.len() - 1];
            t.push(last + (interval - last) * rng.random::<f64>());
        }
        t.push(interval);

        Ok(Self::with_times(t))
    }

    /// Build a model on an explicit time grid `0 = t[0] <= ... <= t[n] = interval`
    pub fn from_times(t: Vec<f64>) -> Result<Self, LossError> {
        if t.len() < 2 {
            return Err(LossError::ZeroDimension);
        }
        let interval = t[t.len() - 1];
        if !interval.is_finite() || interval <= 0.0 {
            return Err(LossError::InvalidInterval(interval));
        }
        if t.iter().any(|v| !v.is_finite()) || t[0] != 0.0 || t.windows(2).any(|w| w[0] > w[1]) {
            return Err(LossError::InvalidCoefficients(
                "time points must start at 0 and be non-decreasing",
            ));
        }
        Ok(Self::with_times(t))
    }

    fn with_times(t: Vec<f64>) -> Self {
        let n = t.len() - 1;
        let b = DMatrix::from_fn(n, n, |row, col| {
            if col <= row {
                (t[col + 1] - t[col]).sqrt()
            } else {
                0.0
            }
        });
        Self { t, b }
    }

    pub fn times(&self) -> &[f64] {
        &self.t
    }

    pub fn increments(&self) -> &DMatrix<f64> {
        &self.b
    }

    pub fn interval(&self) -> f64 {
        self.t[self.t.len() - 1]
    }
}

impl LossFunction for Brownian {
    fn dim(&self) -> usize {
        self.b.nrows()
    }

    fn compute(&self, x: &[f64]) -> Result<f64, LossError> {
        check_dim(self.b.ncols(), x)?;
        let path = &self.b * DVector::from_column_slice(x);
        Ok(path.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    fn name(&self) -> &'static str {
        "Brownian"
    }
}

impl fmt::Display for Brownian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
