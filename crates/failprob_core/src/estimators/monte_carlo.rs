use rand::Rng;

use super::require_samples;
use crate::error::Result;
use crate::loss::LossFunction;
use crate::sampling::exceedance_fraction;

/// Monte Carlo estimate of `P(g(X) > alpha)`
///
/// Draws `num_calls` standard normal inputs and returns the fraction whose
/// loss exceeds `alpha`. Unbiased with variance `pF(1 - pF) / num_calls`; for
/// `pF` well below `1 / num_calls` the estimate is usually exactly zero.
///
/// # Errors
/// [`EstimatorError::ZeroSamples`](crate::error::EstimatorError::ZeroSamples)
/// when `num_calls == 0`.
pub fn mc<L, R>(model: &L, num_calls: usize, alpha: f64, rng: &mut R) -> Result<f64>
where
    L: LossFunction + ?Sized,
    R: Rng + ?Sized,
{
    require_samples("num_calls", num_calls)?;

    let pf = exceedance_fraction(rng, model.dim(), num_calls, |x| {
        Ok(model.compute(x)? > alpha)
    })?;

    tracing::debug!(
        model = model.name(),
        num_calls,
        alpha,
        pf,
        "monte carlo estimate"
    );
    Ok(pf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimatorError;
    use crate::loss::Linear;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_zero_calls_rejected() {
        let model = Linear::from_coefficients(vec![1.0]).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            mc(&model, 0, 1.0, &mut rng),
            Err(EstimatorError::ZeroSamples {
                parameter: "num_calls"
            })
        );
    }

    #[test]
    fn test_extreme_thresholds() {
        let model = Linear::from_coefficients(vec![1.0, 1.0]).unwrap();
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(mc(&model, 500, f64::INFINITY, &mut rng).unwrap(), 0.0);
        assert_eq!(mc(&model, 500, f64::NEG_INFINITY, &mut rng).unwrap(), 1.0);
    }
}
