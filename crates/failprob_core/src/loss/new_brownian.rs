use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{LossFunction, check_dim, uniform_unit_vec};
use crate::error::LossError;

/// Maximum of independently scaled coordinates, `g(x) = max_i sigma_i · x_i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NewBrownianFields", into = "NewBrownianFields")]
pub struct NewBrownian {
    sigma: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct NewBrownianFields {
    sigma: Vec<f64>,
}

impl TryFrom<NewBrownianFields> for NewBrownian {
    type Error = LossError;

    fn try_from(fields: NewBrownianFields) -> Result<Self, LossError> {
        NewBrownian::from_scales(fields.sigma)
    }
}

impl From<NewBrownian> for NewBrownianFields {
    fn from(model: NewBrownian) -> Self {
        Self { sigma: model.sigma }
    }
}

impl NewBrownian {
    /// Draw scales uniformly from [0, 1)
    pub fn new<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self, LossError> {
        if n == 0 {
            return Err(LossError::ZeroDimension);
        }
        Ok(Self {
            sigma: uniform_unit_vec(rng, n),
        })
    }

    /// Build a model from explicit scales
    ///
    /// A zero scale is allowed and pins its coordinate's term to zero.
    pub fn from_scales(sigma: Vec<f64>) -> Result<Self, LossError> {
        if sigma.is_empty() {
            return Err(LossError::ZeroDimension);
        }
        if sigma.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(LossError::InvalidCoefficients(
                "scales must be finite and non-negative",
            ));
        }
        Ok(Self { sigma })
    }

    pub fn scales(&self) -> &[f64] {
        &self.sigma
    }
}

impl LossFunction for NewBrownian {
    fn dim(&self) -> usize {
        self.sigma.len()
    }

    fn compute(&self, x: &[f64]) -> Result<f64, LossError> {
        check_dim(self.sigma.len(), x)?;
        Ok(self
            .sigma
            .iter()
            .zip(x)
            .map(|(s, x)| s * x)
            .fold(f64::NEG_INFINITY, f64::max))
    }

    fn name(&self) -> &'static str {
        "New Brownian"
    }
}

impl fmt::Display for NewBrownian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_scaled_max() {
        let model = NewBrownian::from_scales(vec![0.5, 2.0, 1.0]).unwrap();
        assert!((model.compute(&[4.0, 0.5, -1.0]).unwrap() - 2.0).abs() < 1e-12);
        assert!((model.compute(&[-4.0, -0.5, -1.0]).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_random_scales() {
        let mut rng = SmallRng::seed_from_u64(17);
        let model = NewBrownian::new(10, &mut rng).unwrap();
        assert_eq!(model.dim(), 10);
        assert!(model.scales().iter().all(|s| (0.0..1.0).contains(s)));
        assert_eq!(model.to_string(), "New Brownian");
    }

    #[test]
    fn test_rejects_negative_scales() {
        assert!(NewBrownian::from_scales(vec![1.0, -0.1]).is_err());
        assert_eq!(
            NewBrownian::from_scales(vec![]),
            Err(LossError::ZeroDimension)
        );
    }
}
