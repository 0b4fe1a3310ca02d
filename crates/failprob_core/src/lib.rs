//! Probability-of-failure estimation library
//!
//! This crate estimates `pF = P(g(X) > alpha)` for a random loss function `g`
//! evaluated on standard normal inputs `X`. It provides:
//! - Four families of random loss functions (Linear, Quadratic, Brownian, New Brownian)
//! - A direct Monte Carlo estimator
//! - Surrogate estimators: RBF support vector classifier, random forest,
//!   linear regression, polynomial kernel ridge regression
//! - Closed-form references for the Linear and New Brownian families
//!
//! Randomness always comes from a generator supplied by the caller, so a seeded
//! generator reproduces both the loss realization and every estimate.
//!
//! # Example
//!
//! ```ignore
//! use failprob_core::estimators::{lin_alpha, lin_pf, mc};
//! use failprob_core::loss::Linear;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
//! let model = Linear::new(3, &mut rng)?;
//! let alpha = lin_alpha(&model, 1e-3)?;
//! let estimate = mc(&model, 1_000_000, alpha, &mut rng)?;
//! println!("exact {:.2e}, monte carlo {:.2e}", lin_pf(&model, alpha), estimate);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod estimators;
pub mod loss;
pub mod optimization;
pub mod sampling;
pub mod surrogate;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{EstimatorError, FitError, LossError, Result, RootError};
pub use estimators::{Estimator, ForestParams, PolyRegParams, SvcParams, analytic_reference};
pub use loss::{Brownian, Linear, LossFunction, LossModel, NewBrownian, Quadratic};
