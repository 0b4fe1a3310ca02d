//! Cross-module tests for the estimation library
//!
//! Tests are organized by topic:
//! - `losses` - Loss family construction and evaluation
//! - `monte_carlo` - Direct sampling against closed forms
//! - `surrogates` - Surrogate estimators against Monte Carlo and closed forms
//! - `analytic` - Closed-form formulas and their inverses

mod losses;
