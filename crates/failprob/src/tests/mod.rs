//! End-to-end tests for the experiment runner
//!
//! Tests are organized by topic:
//! - `experiments` - Running configured experiments and reading their reports

mod experiments;
