use thiserror::Error;

/// Errors raised by loss model construction and evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LossError {
    #[error("input has dimension {actual}, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("loss dimension must be at least 1")]
    ZeroDimension,
    #[error("time interval must be finite and positive, got {0}")]
    InvalidInterval(f64),
    #[error("invalid coefficients: {0}")]
    InvalidCoefficients(&'static str),
}

/// Errors raised while fitting a surrogate model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("design matrix has {rows} rows but {targets} targets")]
    ShapeMismatch { rows: usize, targets: usize },
    /// Every training label is the same class, so there is no boundary to learn
    #[error("training labels contain a single class ({label})")]
    SingleClass { label: i8 },
    #[error("linear system could not be solved: {0}")]
    SingularSystem(&'static str),
    #[error("invalid hyperparameter {name}={value}")]
    InvalidHyperparameter { name: &'static str, value: f64 },
}

/// Errors raised by the scalar root finder
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootError {
    #[error("root finder did not converge after {iterations} iterations (last iterate {last})")]
    NoConvergence { iterations: usize, last: f64 },
    #[error("derivative vanished at x={at}")]
    ZeroDerivative { at: f64 },
    #[error("non-finite iterate reached from x={at}")]
    NonFinite { at: f64 },
}

/// Errors surfaced by the probability-of-failure estimators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("{parameter} must be greater than zero")]
    ZeroSamples { parameter: &'static str },
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    #[error(transparent)]
    Loss(#[from] LossError),
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Root(#[from] RootError),
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
