//! Estimators that replace the loss with a model fitted on a uniform sample
//!
//! All four spend `num_calls` loss evaluations on the training set drawn from
//! `[-5, 5]^n`. The classifiers and the kernel regressor are then queried on
//! fresh standard normal draws, which cost no loss evaluations.

use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

use super::require_samples;
use crate::error::Result;
use crate::loss::LossFunction;
use crate::sampling::{TrainingSample, exceedance_fraction};
use crate::surrogate::{
    Classifier, ForestParams, KernelRidge, LinearRegression, PolynomialKernel, RandomForest,
    Regressor, ScaledSvc, SvcParams,
};

/// Settings for [`polyreg`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyRegParams {
    pub degree: u32,
    pub regularization: f64,
    /// Standard normal draws used to evaluate the fitted regressor
    pub samples: usize,
}

impl Default for PolyRegParams {
    fn default() -> Self {
        Self {
            degree: 3,
            regularization: 1e-4,
            samples: 1000,
        }
    }
}

/// Fraction of `size` standard normal draws the classifier labels `+1`
fn classified_fraction<C, R>(classifier: &C, n: usize, size: usize, rng: &mut R) -> Result<f64>
where
    C: Classifier,
    R: Rng + ?Sized,
{
    Ok(exceedance_fraction(rng, n, size, |x| {
        Ok(classifier.predict(x) > 0)
    })?)
}

/// Support vector classifier estimate with default settings
pub fn svm<L, R>(model: &L, num_calls: usize, alpha: f64, rng: &mut R) -> Result<f64>
where
    L: LossFunction + ?Sized,
    R: Rng + ?Sized,
{
    svm_with(model, num_calls, alpha, &SvcParams::default(), rng)
}

/// Support vector classifier estimate
///
/// Fits a standardized RBF classifier to the failure labels of a uniform
/// training sample and returns the fraction of `num_calls` standard normal
/// draws it classifies as failures.
///
/// # Errors
/// `ZeroSamples` for an empty budget, `SingleClass` when the training sample
/// never (or always) fails.
pub fn svm_with<L, R>(
    model: &L,
    num_calls: usize,
    alpha: f64,
    params: &SvcParams,
    rng: &mut R,
) -> Result<f64>
where
    L: LossFunction + ?Sized,
    R: Rng + ?Sized,
{
    require_samples("num_calls", num_calls)?;

    let sample = TrainingSample::draw(model, num_calls, rng)?;
    let classifier = ScaledSvc::fit(&sample.inputs, &sample.labels(alpha), params)?;
    let pf = classified_fraction(&classifier, model.dim(), num_calls, rng)?;

    tracing::debug!(
        model = model.name(),
        num_calls,
        support_vectors = classifier.svc().n_support(),
        pf,
        "svm estimate"
    );
    Ok(pf)
}

/// Random forest estimate
///
/// Same scheme as [`svm_with`] with a bagged ensemble of shallow trees. Tree
/// randomness comes from `params.seed`; `rng` only drives the sampling.
pub fn rf<L, R>(
    model: &L,
    num_calls: usize,
    alpha: f64,
    params: &ForestParams,
    rng: &mut R,
) -> Result<f64>
where
    L: LossFunction + ?Sized,
    R: Rng + ?Sized,
{
    require_samples("num_calls", num_calls)?;

    let sample = TrainingSample::draw(model, num_calls, rng)?;
    let forest = RandomForest::fit(&sample.inputs, &sample.labels(alpha), params)?;
    let pf = classified_fraction(&forest, model.dim(), num_calls, rng)?;

    tracing::debug!(
        model = model.name(),
        num_calls,
        trees = forest.n_trees(),
        depth = forest.max_depth(),
        pf,
        "random forest estimate"
    );
    Ok(pf)
}

/// Linear regression estimate
///
/// Fits `g(x) ≈ b + c·x` and treats the fit as exact: under standard normal
/// inputs the surrogate is `N(b, ||c||²)`, so `pF = 1 - Φ((alpha - b) / ||c||)`.
/// A flat fit gives 0 or 1 depending on which side of `alpha` the intercept falls.
pub fn linreg<L, R>(model: &L, num_calls: usize, alpha: f64, rng: &mut R) -> Result<f64>
where
    L: LossFunction + ?Sized,
    R: Rng + ?Sized,
{
    require_samples("num_calls", num_calls)?;

    let sample = TrainingSample::draw(model, num_calls, rng)?;
    let fit = LinearRegression::fit(&sample.inputs, &sample.losses)?;

    let norm = fit.coef_norm();
    let pf = 1.0 - Normal::standard().cdf((alpha - fit.intercept()) / norm);

    tracing::debug!(
        model = model.name(),
        num_calls,
        intercept = fit.intercept(),
        coef_norm = norm,
        pf,
        "linear regression estimate"
    );
    Ok(pf)
}

/// Polynomial kernel ridge regression estimate
///
/// Regresses the loss on a uniform training sample, then counts how many of
/// `params.samples` standard normal draws have a predicted loss above `alpha`.
///
/// The fit solves a dense `num_calls × num_calls` system, so it takes
/// `O(num_calls³)` time and `O(num_calls²)` memory. Budgets of a few thousand
/// calls already take seconds.
pub fn polyreg<L, R>(
    model: &L,
    num_calls: usize,
    alpha: f64,
    params: &PolyRegParams,
    rng: &mut R,
) -> Result<f64>
where
    L: LossFunction + ?Sized,
    R: Rng + ?Sized,
{
    require_samples("num_calls", num_calls)?;
    require_samples("samples", params.samples)?;

    let n = model.dim();
    let sample = TrainingSample::draw(model, num_calls, rng)?;
    let kernel = PolynomialKernel::with_default_scale(params.degree, n);
    let fit = KernelRidge::fit(&sample.inputs, &sample.losses, kernel, params.regularization)?;

    let pf = exceedance_fraction(rng, n, params.samples, |x| Ok(fit.predict(x) > alpha))?;

    tracing::debug!(
        model = model.name(),
        num_calls,
        degree = params.degree,
        samples = params.samples,
        pf,
        "polynomial regression estimate"
    );
    Ok(pf)
}
