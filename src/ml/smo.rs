//! Sequential minimal optimization for the binary soft-margin dual.
//!
//! Solves
//!
//! ```text
//! min_a  1/2 a^T Q a - e^T a
//! s.t.   y^T a = 0,  0 <= a_i <= C
//! ```
//!
//! where `Q_ij = y_i y_j K(x_i, x_j)`. Working pairs are chosen with
//! second-order information (maximal violating pair on the gradient, best
//! objective decrease for the partner), and the iteration stops once the
//! maximal KKT violation falls below `tol`.

use ndarray::Array2;

/// Floor for non-positive curvature in the pair update.
const TAU: f64 = 1e-12;

/// Result of a binary solve.
#[derive(Debug, Clone)]
pub struct SmoSolution {
    /// Dual coefficients, one per training sample
    pub alpha: Vec<f64>,
    /// Bias; the decision value is `sum(alpha_i y_i K(x_i, x)) - rho`
    pub rho: f64,
    /// Number of pair updates performed
    pub iterations: usize,
}

struct Solver<'a> {
    gram: &'a Array2<f64>,
    y: &'a [f64],
    c: f64,
    alpha: Vec<f64>,
    grad: Vec<f64>,
}

impl Solver<'_> {
    fn q(&self, i: usize, j: usize) -> f64 {
        self.y[i] * self.y[j] * self.gram[[i, j]]
    }

    fn at_upper(&self, i: usize) -> bool {
        self.alpha[i] >= self.c
    }

    fn at_lower(&self, i: usize) -> bool {
        self.alpha[i] <= 0.0
    }

    /// Pick the working pair, or `None` once the KKT violation is below `tol`.
    fn select_working_set(&self, tol: f64) -> Option<(usize, usize)> {
        let n = self.y.len();
        let mut gmax = f64::NEG_INFINITY;
        let mut gmax_idx = None;

        for t in 0..n {
            if self.y[t] > 0.0 {
                if !self.at_upper(t) && -self.grad[t] >= gmax {
                    gmax = -self.grad[t];
                    gmax_idx = Some(t);
                }
            } else if !self.at_lower(t) && self.grad[t] >= gmax {
                gmax = self.grad[t];
                gmax_idx = Some(t);
            }
        }

        let i = gmax_idx?;
        let qd_i = self.gram[[i, i]];
        let mut gmax2 = f64::NEG_INFINITY;
        let mut gmin_idx = None;
        let mut obj_diff_min = f64::INFINITY;

        for j in 0..n {
            let qd_j = self.gram[[j, j]];
            let (eligible, grad_diff, violation, quad_coef) = if self.y[j] > 0.0 {
                (
                    !self.at_lower(j),
                    gmax + self.grad[j],
                    self.grad[j],
                    qd_i + qd_j - 2.0 * self.y[i] * self.q(i, j),
                )
            } else {
                (
                    !self.at_upper(j),
                    gmax - self.grad[j],
                    -self.grad[j],
                    qd_i + qd_j + 2.0 * self.y[i] * self.q(i, j),
                )
            };

            if !eligible {
                continue;
            }
            if violation >= gmax2 {
                gmax2 = violation;
            }
            if grad_diff > 0.0 {
                let curvature = if quad_coef > 0.0 { quad_coef } else { TAU };
                let obj_diff = -(grad_diff * grad_diff) / curvature;
                if obj_diff <= obj_diff_min {
                    gmin_idx = Some(j);
                    obj_diff_min = obj_diff;
                }
            }
        }

        if gmax + gmax2 < tol {
            return None;
        }
        gmin_idx.map(|j| (i, j))
    }

    /// Analytic update of the pair, clipped to the box.
    fn update_pair(&mut self, i: usize, j: usize) {
        let c = self.c;
        let qd_i = self.gram[[i, i]];
        let qd_j = self.gram[[j, j]];
        let q_ij = self.q(i, j);
        let old_i = self.alpha[i];
        let old_j = self.alpha[j];

        if self.y[i] != self.y[j] {
            let quad_coef = qd_i + qd_j + 2.0 * q_ij;
            let quad_coef = if quad_coef > 0.0 { quad_coef } else { TAU };
            let delta = (-self.grad[i] - self.grad[j]) / quad_coef;
            let diff = old_i - old_j;
            let mut a_i = old_i + delta;
            let mut a_j = old_j + delta;

            if diff > 0.0 {
                if a_j < 0.0 {
                    a_j = 0.0;
                    a_i = diff;
                }
            } else if a_i < 0.0 {
                a_i = 0.0;
                a_j = -diff;
            }
            if diff > 0.0 {
                if a_i > c {
                    a_i = c;
                    a_j = c - diff;
                }
            } else if a_j > c {
                a_j = c;
                a_i = c + diff;
            }
            self.alpha[i] = a_i;
            self.alpha[j] = a_j;
        } else {
            let quad_coef = qd_i + qd_j - 2.0 * q_ij;
            let quad_coef = if quad_coef > 0.0 { quad_coef } else { TAU };
            let delta = (self.grad[i] - self.grad[j]) / quad_coef;
            let sum = old_i + old_j;
            let mut a_i = old_i - delta;
            let mut a_j = old_j + delta;

            if sum > c {
                if a_i > c {
                    a_i = c;
                    a_j = sum - c;
                }
            } else if a_j < 0.0 {
                a_j = 0.0;
                a_i = sum;
            }
            if sum > c {
                if a_j > c {
                    a_j = c;
                    a_i = sum - c;
                }
            } else if a_i < 0.0 {
                a_i = 0.0;
                a_j = sum;
            }
            self.alpha[i] = a_i;
            self.alpha[j] = a_j;
        }

        let delta_i = self.alpha[i] - old_i;
        let delta_j = self.alpha[j] - old_j;
        for k in 0..self.y.len() {
            self.grad[k] += self.q(i, k) * delta_i + self.q(j, k) * delta_j;
        }
    }

    fn compute_rho(&self) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_count = 0usize;
        let mut free_sum = 0.0;

        for i in 0..self.y.len() {
            let yg = self.y[i] * self.grad[i];
            if self.at_upper(i) {
                if self.y[i] < 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else if self.at_lower(i) {
                if self.y[i] > 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else {
                free_count += 1;
                free_sum += yg;
            }
        }

        if free_count > 0 {
            free_sum / free_count as f64
        } else {
            (upper + lower) / 2.0
        }
    }
}

/// Solve the binary problem for labels `y` in `{+1, -1}` over a precomputed
/// kernel matrix.
///
/// # Arguments
///
/// * `gram` - Kernel matrix `K(x_i, x_j)` of the training samples
/// * `y` - Labels, `+1.0` or `-1.0`
/// * `c` - Box constraint
/// * `tol` - Stopping tolerance on the KKT violation
pub fn solve(gram: &Array2<f64>, y: &[f64], c: f64, tol: f64) -> SmoSolution {
    let n = y.len();
    let mut solver = Solver {
        gram,
        y,
        c,
        alpha: vec![0.0; n],
        grad: vec![-1.0; n],
    };

    let max_iter = (100 * n).max(10_000_000);
    let mut iterations = 0;
    while iterations < max_iter {
        match solver.select_working_set(tol) {
            Some((i, j)) => solver.update_pair(i, j),
            None => break,
        }
        iterations += 1;
    }

    let rho = solver.compute_rho();
    SmoSolution {
        alpha: solver.alpha,
        rho,
        iterations,
    }
}

/// Decision value of a solution for a sample, given its kernel row against
/// the training samples.
pub fn decision_value(solution: &SmoSolution, y: &[f64], kernel_row: impl Fn(usize) -> f64) -> f64 {
    solution
        .alpha
        .iter()
        .zip(y)
        .enumerate()
        .filter(|(_, (a, _))| **a > 0.0)
        .map(|(i, (a, yi))| a * yi * kernel_row(i))
        .sum::<f64>()
        - solution.rho
}
