//! Soft-margin support vector classifier with an RBF kernel
//!
//! The dual problem
//!
//! ```text
//! min  ½ αᵀQα − Σα   s.t.  0 ≤ α ≤ C,  yᵀα = 0,   Q_ij = y_i y_j K(x_i, x_j)
//! ```
//!
//! is solved by sequential minimal optimization. Each step picks the
//! maximal violating pair of the KKT conditions and solves the two-variable
//! subproblem in closed form. Kernel rows are computed on demand and kept in
//! a bounded cache owned by the fit call.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use nalgebra::DMatrix;

use super::{Classifier, StandardScaler, check_training_set, check_two_classes, matrix_rows};
use crate::error::FitError;

/// Floor for the curvature of a two-variable subproblem
const TAU: f64 = 1e-12;

/// Kernel cache budget in bytes
const CACHE_BYTES: usize = 200 * 1024 * 1024;

/// Hyperparameters for [`RbfSvc`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvcParams {
    /// Box constraint on the dual coefficients
    pub c: f64,
    /// Stopping tolerance on the maximal KKT violation
    pub tolerance: f64,
    /// RBF width; `None` uses `1 / n_features`
    pub gamma: Option<f64>,
}

impl Default for SvcParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-3,
            gamma: None,
        }
    }
}

#[inline]
fn rbf(gamma: f64, a: &[f64], b: &[f64]) -> f64 {
    let sq: f64 = a.iter().zip(b).map(|(a, b)| (a - b) * (a - b)).sum();
    (-gamma * sq).exp()
}

/// On-demand rows of `Q` with FIFO eviction
struct KernelRows<'a> {
    rows: &'a [Vec<f64>],
    y: &'a [f64],
    gamma: f64,
    cache: HashMap<usize, Rc<[f64]>>,
    order: VecDeque<usize>,
    capacity: usize,
}

impl<'a> KernelRows<'a> {
    fn new(rows: &'a [Vec<f64>], y: &'a [f64], gamma: f64) -> Self {
        let capacity = (CACHE_BYTES / (8 * rows.len().max(1))).max(2);
        Self {
            rows,
            y,
            gamma,
            cache: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn q_row(&mut self, i: usize) -> Rc<[f64]> {
        if let Some(row) = self.cache.get(&i) {
            return Rc::clone(row);
        }

        let xi = &self.rows[i];
        let yi = self.y[i];
        let row: Rc<[f64]> = self
            .rows
            .iter()
            .zip(self.y)
            .map(|(xj, yj)| yi * yj * rbf(self.gamma, xi, xj))
            .collect();

        if self.order.len() >= self.capacity
            && let Some(evicted) = self.order.pop_front()
        {
            self.cache.remove(&evicted);
        }
        self.order.push_back(i);
        self.cache.insert(i, Rc::clone(&row));
        row
    }
}

/// A fitted RBF support vector classifier
#[derive(Debug, Clone)]
pub struct RbfSvc {
    support_vectors: Vec<Vec<f64>>,
    /// `α_i y_i` for each support vector
    dual_coef: Vec<f64>,
    rho: f64,
    gamma: f64,
}

impl RbfSvc {
    /// Fit on rows of `x` with labels in `{-1, +1}`
    ///
    /// # Errors
    /// Fails on an empty or mismatched training set, a single-class label
    /// set, or a non-positive `c`.
    pub fn fit(x: &DMatrix<f64>, y: &[i8], params: &SvcParams) -> Result<Self, FitError> {
        check_training_set(x, y.len())?;
        check_two_classes(y)?;
        if params.c.is_nan() || params.c <= 0.0 {
            return Err(FitError::InvalidHyperparameter {
                name: "c",
                value: params.c,
            });
        }
        let gamma = params.gamma.unwrap_or(1.0 / x.ncols() as f64);
        if gamma.is_nan() || gamma <= 0.0 {
            return Err(FitError::InvalidHyperparameter {
                name: "gamma",
                value: gamma,
            });
        }

        let rows = matrix_rows(x);
        let y: Vec<f64> = y.iter().map(|&label| f64::from(label)).collect();
        let l = rows.len();
        let c = params.c;

        let mut alpha = vec![0.0; l];
        // Gradient of the dual objective, Qα − e
        let mut grad = vec![-1.0; l];
        let mut kernel = KernelRows::new(&rows, &y, gamma);

        let max_iterations = 10_000_000_usize.max(100 * l);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < max_iterations {
            let Some((i, j)) = select_working_set(&alpha, &grad, &y, c, params.tolerance) else {
                converged = true;
                break;
            };
            iterations += 1;

            let q_i = kernel.q_row(i);
            let q_j = kernel.q_row(j);
            let (old_i, old_j) = (alpha[i], alpha[j]);

            // K(x, x) = 1 for the RBF kernel
            if y[i] != y[j] {
                let quad = (2.0 + 2.0 * q_i[j]).max(TAU);
                let delta = (-grad[i] - grad[j]) / quad;
                let diff = alpha[i] - alpha[j];
                alpha[i] += delta;
                alpha[j] += delta;
                if diff > 0.0 {
                    if alpha[j] < 0.0 {
                        alpha[j] = 0.0;
                        alpha[i] = diff;
                    }
                } else if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = -diff;
                }
                if diff > 0.0 {
                    if alpha[i] > c {
                        alpha[i] = c;
                        alpha[j] = c - diff;
                    }
                } else if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = c + diff;
                }
            } else {
                let quad = (2.0 - 2.0 * q_i[j]).max(TAU);
                let delta = (grad[i] - grad[j]) / quad;
                let sum = alpha[i] + alpha[j];
                alpha[i] -= delta;
                alpha[j] += delta;
                if sum > c {
                    if alpha[i] > c {
                        alpha[i] = c;
                        alpha[j] = sum - c;
                    }
                    if alpha[j] > c {
                        alpha[j] = c;
                        alpha[i] = sum - c;
                    }
                } else {
                    if alpha[j] < 0.0 {
                        alpha[j] = 0.0;
                        alpha[i] = sum;
                    }
                    if alpha[i] < 0.0 {
                        alpha[i] = 0.0;
                        alpha[j] = sum;
                    }
                }
            }

            let delta_i = alpha[i] - old_i;
            let delta_j = alpha[j] - old_j;
            for (k, g) in grad.iter_mut().enumerate() {
                *g += q_i[k] * delta_i + q_j[k] * delta_j;
            }
        }

        drop(kernel);

        if !converged {
            tracing::warn!(iterations, "SVC solver reached its iteration cap");
        }

        let rho = compute_rho(&alpha, &grad, &y, c);

        let mut support_vectors = Vec::new();
        let mut dual_coef = Vec::new();
        for ((a, label), row) in alpha.iter().zip(&y).zip(rows) {
            if *a > 0.0 {
                support_vectors.push(row);
                dual_coef.push(a * label);
            }
        }

        tracing::debug!(
            samples = l,
            support_vectors = support_vectors.len(),
            iterations,
            rho,
            "fitted RBF SVC"
        );

        Ok(Self {
            support_vectors,
            dual_coef,
            rho,
            gamma,
        })
    }

    /// Signed distance-like score; positive means class `+1`
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| coef * rbf(self.gamma, sv, x))
            .sum::<f64>()
            - self.rho
    }

    pub fn n_support(&self) -> usize {
        self.support_vectors.len()
    }
}

impl Classifier for RbfSvc {
    fn predict(&self, x: &[f64]) -> i8 {
        if self.decision_function(x) > 0.0 { 1 } else { -1 }
    }
}

/// Pick the maximal violating pair, or `None` once the KKT gap is below `tolerance`
fn select_working_set(
    alpha: &[f64],
    grad: &[f64],
    y: &[f64],
    c: f64,
    tolerance: f64,
) -> Option<(usize, usize)> {
    let mut g_max = f64::NEG_INFINITY;
    let mut g_min = f64::INFINITY;
    let mut i_sel = None;
    let mut j_sel = None;

    for t in 0..alpha.len() {
        let score = -y[t] * grad[t];
        let in_up = if y[t] > 0.0 { alpha[t] < c } else { alpha[t] > 0.0 };
        let in_low = if y[t] > 0.0 { alpha[t] > 0.0 } else { alpha[t] < c };
        if in_up && score > g_max {
            g_max = score;
            i_sel = Some(t);
        }
        if in_low && score < g_min {
            g_min = score;
            j_sel = Some(t);
        }
    }

    match (i_sel, j_sel) {
        (Some(i), Some(j)) if g_max - g_min >= tolerance => Some((i, j)),
        _ => None,
    }
}

/// Offset of the decision function from the final gradient
fn compute_rho(alpha: &[f64], grad: &[f64], y: &[f64], c: f64) -> f64 {
    let mut upper = f64::INFINITY;
    let mut lower = f64::NEG_INFINITY;
    let mut free_sum = 0.0;
    let mut free_count = 0usize;

    for t in 0..alpha.len() {
        let yg = y[t] * grad[t];
        if alpha[t] >= c {
            if y[t] < 0.0 {
                upper = upper.min(yg);
            } else {
                lower = lower.max(yg);
            }
        } else if alpha[t] <= 0.0 {
            if y[t] > 0.0 {
                upper = upper.min(yg);
            } else {
                lower = lower.max(yg);
            }
        } else {
            free_sum += yg;
            free_count += 1;
        }
    }

    if free_count > 0 {
        free_sum / free_count as f64
    } else {
        (upper + lower) / 2.0
    }
}

/// Standardization followed by an RBF SVC, applied together at prediction time
#[derive(Debug, Clone)]
pub struct ScaledSvc {
    scaler: StandardScaler,
    svc: RbfSvc,
}

impl ScaledSvc {
    pub fn fit(x: &DMatrix<f64>, y: &[i8], params: &SvcParams) -> Result<Self, FitError> {
        let scaler = StandardScaler::fit(x)?;
        let svc = RbfSvc::fit(&scaler.transform(x), y, params)?;
        Ok(Self { scaler, svc })
    }

    pub fn svc(&self) -> &RbfSvc {
        &self.svc
    }
}

impl Classifier for ScaledSvc {
    fn predict(&self, x: &[f64]) -> i8 {
        self.svc.predict(&self.scaler.transform_row(x))
    }
}
