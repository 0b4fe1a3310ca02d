//! Input distributions
//!
//! Probabilities are always evaluated under the standard normal reference
//! distribution. Surrogates are trained on a wider uniform box so the fit
//! sees the tail region around the threshold.

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::LossError;
use crate::loss::LossFunction;

/// Half-width of the uniform training box `[-5, 5]^n`
pub const TRAINING_HALF_WIDTH: f64 = 5.0;

/// Draw one standard normal vector of dimension `n`
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| -> f64 { StandardNormal.sample(&mut *rng) })
        .collect()
}

/// Draw one vector uniformly from the training box
pub fn training_point<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| rng.random_range(-TRAINING_HALF_WIDTH..TRAINING_HALF_WIDTH))
        .collect()
}

/// Inputs and loss values from the training distribution
#[derive(Debug, Clone)]
pub struct TrainingSample {
    /// One row per draw
    pub inputs: DMatrix<f64>,
    /// Loss value for each row
    pub losses: Vec<f64>,
}

impl TrainingSample {
    /// Draw `size` points from the training box and evaluate `model` on each
    pub fn draw<L, R>(model: &L, size: usize, rng: &mut R) -> Result<Self, LossError>
    where
        L: LossFunction + ?Sized,
        R: Rng + ?Sized,
    {
        let n = model.dim();
        let mut inputs = DMatrix::zeros(size, n);
        let mut losses = Vec::with_capacity(size);

        for row in 0..size {
            let x = training_point(rng, n);
            losses.push(model.compute(&x)?);
            for (col, value) in x.into_iter().enumerate() {
                inputs[(row, col)] = value;
            }
        }

        Ok(Self { inputs, losses })
    }

    /// Binary labels: `+1` where the loss exceeds `alpha`, `-1` elsewhere
    #[must_use]
    pub fn labels(&self, alpha: f64) -> Vec<i8> {
        self.losses
            .iter()
            .map(|&loss| if loss > alpha { 1 } else { -1 })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }
}

/// Fraction of `size` fresh standard normal draws for which `fails` holds
pub fn exceedance_fraction<R, F>(
    rng: &mut R,
    n: usize,
    size: usize,
    mut fails: F,
) -> Result<f64, LossError>
where
    R: Rng + ?Sized,
    F: FnMut(&[f64]) -> Result<bool, LossError>,
{
    let mut count = 0usize;
    for _ in 0..size {
        let x = standard_normal(rng, n);
        if fails(&x)? {
            count += 1;
        }
    }
    Ok(count as f64 / size as f64)
}
