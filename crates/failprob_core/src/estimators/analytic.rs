//! Closed-form probabilities for the tractable loss families
//!
//! For `Linear`, `a·X` is exactly `N(0, ||a||²)`. For `NewBrownian` the
//! coordinates are independent and `-Σ ln Φ(alpha / sigma_i)` is the
//! small-probability expansion of `1 - Π Φ(alpha / sigma_i)`.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::{EstimatorError, Result};
use crate::loss::{Linear, LossModel, NewBrownian};
use crate::optimization::{NewtonConfig, newton};

fn check_probability(pf: f64) -> Result<()> {
    if (0.0..=1.0).contains(&pf) {
        Ok(())
    } else {
        Err(EstimatorError::InvalidProbability(pf))
    }
}

/// Exact `P(a·X > alpha) = 1 - Φ(alpha / ||a||)`
///
/// All-zero coefficients make the loss identically zero, so the result is
/// 1 below zero and 0 from zero upwards.
pub fn lin_pf(model: &Linear, alpha: f64) -> f64 {
    let norm = model.norm();
    if norm == 0.0 {
        return if alpha < 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - Normal::standard().cdf(alpha / norm)
}

/// Threshold whose exceedance probability under a linear loss is `pf`
pub fn lin_alpha(model: &Linear, pf: f64) -> Result<f64> {
    check_probability(pf)?;
    Ok(model.norm() * Normal::standard().inverse_cdf(1.0 - pf))
}

/// `P(sigma X <= alpha)` for one coordinate, including the point mass at `sigma = 0`
fn coordinate_cdf(normal: &Normal, sigma: f64, alpha: f64) -> f64 {
    if sigma == 0.0 {
        if alpha >= 0.0 { 1.0 } else { 0.0 }
    } else {
        normal.cdf(alpha / sigma)
    }
}

/// Asymptotic `P(max_i sigma_i X_i > alpha)`, accurate when the result is small
///
/// A zero scale contributes nothing for `alpha >= 0` and makes the result
/// infinite below zero, where that coordinate alone always fails.
pub fn new_brown_pf(model: &NewBrownian, alpha: f64) -> f64 {
    let normal = Normal::standard();
    -model
        .scales()
        .iter()
        .map(|&s| coordinate_cdf(&normal, s, alpha).ln())
        .sum::<f64>()
}

/// Invert [`new_brown_pf`] with Newton's method from `alpha = 0`
///
/// The slope used is `-Σ φ(alpha / sigma_i) / sigma_i`, which drops the
/// `1 / Φ` factor of the exact derivative. Near the small-probability roots
/// of interest `Φ ≈ 1`, so the iteration still converges. Zero scales have a
/// flat term and are left out of the slope.
pub fn new_brown_alpha(model: &NewBrownian, pf: f64) -> Result<f64> {
    check_probability(pf)?;
    let normal = Normal::standard();

    let alpha = newton(
        |alpha| new_brown_pf(model, alpha) - pf,
        |alpha| {
            -model
                .scales()
                .iter()
                .filter(|&&s| s > 0.0)
                .map(|s| normal.pdf(alpha / s) / s)
                .sum::<f64>()
        },
        0.0,
        NewtonConfig::default(),
    )?;

    tracing::debug!(pf, alpha, "inverted new brownian probability");
    Ok(alpha)
}

/// Analytic probability for model families that have one
pub fn analytic_reference(model: &LossModel, alpha: f64) -> Option<f64> {
    match model {
        LossModel::Linear(m) => Some(lin_pf(m, alpha)),
        LossModel::NewBrownian(m) => Some(new_brown_pf(m, alpha)),
        LossModel::Quadratic(_) | LossModel::Brownian(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lin_pf_at_zero_is_half() {
        let model = Linear::from_coefficients(vec![3.0, 4.0]).unwrap();
        assert!((lin_pf(&model, 0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_lin_alpha_rejects_bad_probability() {
        let model = Linear::from_coefficients(vec![1.0]).unwrap();
        assert_eq!(
            lin_alpha(&model, 1.5),
            Err(EstimatorError::InvalidProbability(1.5))
        );
        assert!(matches!(
            lin_alpha(&model, f64::NAN),
            Err(EstimatorError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_new_brown_pf_identical_scales() {
        let model = NewBrownian::from_scales(vec![1.0, 1.0, 1.0]).unwrap();
        let expected = -3.0 * Normal::standard().cdf(3.0).ln();
        assert!((new_brown_pf(&model, 3.0) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_lin_pf_zero_coefficients() {
        let model = Linear::from_coefficients(vec![0.0, 0.0]).unwrap();
        assert_eq!(lin_pf(&model, 0.0), 0.0);
        assert_eq!(lin_pf(&model, 2.0), 0.0);
        assert_eq!(lin_pf(&model, -1.0), 1.0);
    }

    #[test]
    fn test_new_brown_pf_zero_scale() {
        let model = NewBrownian::from_scales(vec![1.0, 0.0]).unwrap();
        // Only the unit-scale coordinate contributes: -ln Φ(0) = ln 2
        assert!((new_brown_pf(&model, 0.0) - 2.0_f64.ln()).abs() < 1e-12);
        let single = NewBrownian::from_scales(vec![1.0]).unwrap();
        assert_eq!(new_brown_pf(&model, 2.5), new_brown_pf(&single, 2.5));
        assert_eq!(new_brown_pf(&model, -0.5), f64::INFINITY);

        let flat = NewBrownian::from_scales(vec![0.0, 0.0]).unwrap();
        assert_eq!(new_brown_pf(&flat, 0.0), 0.0);
    }

    #[test]
    fn test_new_brown_alpha_ignores_zero_scale() {
        let model = NewBrownian::from_scales(vec![0.5, 0.0, 1.5]).unwrap();
        let alpha = new_brown_alpha(&model, 1e-3).unwrap();
        assert!(alpha.is_finite());
        assert!((new_brown_pf(&model, alpha) - 1e-3).abs() < 1e-9);
    }

    #[test]
    fn test_reference_only_for_tractable_families() {
        let linear = LossModel::Linear(Linear::from_coefficients(vec![1.0]).unwrap());
        assert!(analytic_reference(&linear, 1.0).is_some());

        let mut rng = <rand::rngs::SmallRng as rand::SeedableRng>::seed_from_u64(0);
        let quadratic = LossModel::Quadratic(crate::loss::Quadratic::new(2, &mut rng).unwrap());
        assert_eq!(analytic_reference(&quadratic, 1.0), None);
    }
}
