use std::fmt;
use std::time::Duration;

use failprob_core::EstimatorError;

/// One estimator's outcome
#[derive(Debug, Clone)]
pub struct EstimateRow {
    pub label: &'static str,
    pub outcome: Result<f64, EstimatorError>,
    pub elapsed: Duration,
}

impl EstimateRow {
    /// `|estimate - reference|`
    pub fn abs_error(&self, reference: Option<f64>) -> Option<f64> {
        let estimate = *self.outcome.as_ref().ok()?;
        Some((estimate - reference?).abs())
    }

    /// `|estimate - reference| / reference`, undefined for a zero reference
    pub fn rel_error(&self, reference: Option<f64>) -> Option<f64> {
        let reference = reference.filter(|r| *r != 0.0)?;
        Some(self.abs_error(Some(reference))? / reference.abs())
    }
}

/// Results of one experiment
#[derive(Debug, Clone)]
pub struct Report {
    pub model: &'static str,
    pub dim: usize,
    pub seed: u64,
    pub num_calls: usize,
    pub alpha: f64,
    /// Closed-form probability when the loss family has one
    pub reference: Option<f64>,
    pub rows: Vec<EstimateRow>,
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4e}"))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} loss, n={}, alpha={:.6}, num_calls={}, seed={}",
            self.model, self.dim, self.alpha, self.num_calls, self.seed
        )?;
        writeln!(f, "analytic reference: {}", format_optional(self.reference))?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:>12} {:>12} {:>12} {:>10}",
            "estimator", "pF", "abs err", "rel err", "time"
        )?;

        for row in &self.rows {
            match &row.outcome {
                Ok(pf) => writeln!(
                    f,
                    "{:<10} {:>12.4e} {:>12} {:>12} {:>8.1}ms",
                    row.label,
                    pf,
                    format_optional(row.abs_error(self.reference)),
                    format_optional(row.rel_error(self.reference)),
                    row.elapsed.as_secs_f64() * 1000.0
                )?,
                Err(err) => writeln!(f, "{:<10} error: {err}", row.label)?,
            }
        }
        Ok(())
    }
}
