//! Newton's method for scalar equations
//!
//! Iterates `x ← x - f(x) / f'(x)` until successive iterates agree to within
//! the step tolerance. The derivative is supplied by the caller; it only has
//! to point the right way and be of the right scale near the root.

use crate::error::RootError;

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Absolute tolerance on the step size
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.48e-8,
            max_iterations: 50,
        }
    }
}

/// Find a root of `f` starting from `x0`
///
/// # Arguments
/// * `f` - Function whose root is sought
/// * `fprime` - Derivative (or a usable approximation) of `f`
/// * `x0` - Starting point
/// * `config` - Tolerance and iteration cap
///
/// # Errors
/// Returns [`RootError::ZeroDerivative`] when `fprime` vanishes at an iterate,
/// [`RootError::NonFinite`] when an iterate leaves the finite reals, and
/// [`RootError::NoConvergence`] when the iteration cap is reached.
pub fn newton<F, D>(f: F, fprime: D, x0: f64, config: NewtonConfig) -> Result<f64, RootError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if fx == 0.0 {
            return Ok(x);
        }

        let slope = fprime(x);
        if slope == 0.0 {
            return Err(RootError::ZeroDerivative { at: x });
        }

        let next = x - fx / slope;
        if !next.is_finite() {
            return Err(RootError::NonFinite { at: x });
        }

        tracing::trace!(iteration, x = next, residual = fx, "newton step");

        if (next - x).abs() <= config.tolerance {
            return Ok(next);
        }
        x = next;
    }

    Err(RootError::NoConvergence {
        iterations: config.max_iterations,
        last: x,
    })
}
