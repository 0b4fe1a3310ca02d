//! Scalar root finding
//!
//! Used by the analytic inverse formulas, which solve `pF(alpha) = target`
//! for a monotone `pF`.

mod newton;

pub use newton::{NewtonConfig, newton};
