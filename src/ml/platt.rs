//! Probability calibration.
//!
//! Binary decision values are mapped to probabilities with a fitted sigmoid
//! `P(y = +1 | f) = 1 / (1 + exp(A f + B))` (Platt scaling, with the
//! Newton/backtracking fit of Lin, Lin and Weng). Pairwise probabilities are
//! then coupled into one distribution over all classes with the second
//! method of Wu, Lin and Weng.

use serde::{Deserialize, Serialize};

/// Pairwise probabilities are clipped to `[MIN_PROB, 1 - MIN_PROB]`.
pub const MIN_PROB: f64 = 1e-7;

const MAX_ITER: usize = 100;
const MIN_STEP: f64 = 1e-10;
const SIGMA: f64 = 1e-12;
const EPS: f64 = 1e-5;

/// Fitted sigmoid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sigmoid {
    /// Slope
    pub a: f64,
    /// Offset
    pub b: f64,
}

impl Sigmoid {
    /// Probability of the positive class for a decision value.
    pub fn predict(&self, decision: f64) -> f64 {
        let f_apb = decision * self.a + self.b;
        if f_apb >= 0.0 {
            (-f_apb).exp() / (1.0 + (-f_apb).exp())
        } else {
            1.0 / (1.0 + f_apb.exp())
        }
    }

    /// Clipped pairwise probability.
    pub fn pairwise(&self, decision: f64) -> f64 {
        self.predict(decision).clamp(MIN_PROB, 1.0 - MIN_PROB)
    }
}

fn log_loss(decisions: &[f64], targets: &[f64], a: f64, b: f64) -> f64 {
    decisions
        .iter()
        .zip(targets)
        .map(|(&d, &t)| {
            let f_apb = d * a + b;
            if f_apb >= 0.0 {
                t * f_apb + (1.0 + (-f_apb).exp()).ln()
            } else {
                (t - 1.0) * f_apb + (1.0 + f_apb.exp()).ln()
            }
        })
        .sum()
}

/// Fit a sigmoid to decision values and their labels.
///
/// # Arguments
///
/// * `decisions` - Held-out decision values
/// * `positive` - Whether each sample belongs to the positive class
pub fn fit_sigmoid(decisions: &[f64], positive: &[bool]) -> Sigmoid {
    let prior1 = positive.iter().filter(|&&p| p).count() as f64;
    let prior0 = positive.len() as f64 - prior1;

    let hi_target = (prior1 + 1.0) / (prior1 + 2.0);
    let lo_target = 1.0 / (prior0 + 2.0);
    let targets: Vec<f64> = positive
        .iter()
        .map(|&p| if p { hi_target } else { lo_target })
        .collect();

    let mut a = 0.0;
    let mut b = ((prior0 + 1.0) / (prior1 + 1.0)).ln();
    let mut fval = log_loss(decisions, &targets, a, b);

    for _ in 0..MAX_ITER {
        // Gradient and Hessian (H' = H + sigma I)
        let mut h11 = SIGMA;
        let mut h22 = SIGMA;
        let mut h21 = 0.0;
        let mut g1 = 0.0;
        let mut g2 = 0.0;

        for (&d, &t) in decisions.iter().zip(&targets) {
            let f_apb = d * a + b;
            let (p, q) = if f_apb >= 0.0 {
                let e = (-f_apb).exp();
                (e / (1.0 + e), 1.0 / (1.0 + e))
            } else {
                let e = f_apb.exp();
                (1.0 / (1.0 + e), e / (1.0 + e))
            };
            let d2 = p * q;
            h11 += d * d * d2;
            h22 += d2;
            h21 += d * d2;
            let d1 = t - p;
            g1 += d * d1;
            g2 += d1;
        }

        if g1.abs() < EPS && g2.abs() < EPS {
            break;
        }

        let det = h11 * h22 - h21 * h21;
        let da = -(h22 * g1 - h21 * g2) / det;
        let db = -(-h21 * g1 + h11 * g2) / det;
        let gd = g1 * da + g2 * db;

        let mut step = 1.0;
        while step >= MIN_STEP {
            let new_a = a + step * da;
            let new_b = b + step * db;
            let new_f = log_loss(decisions, &targets, new_a, new_b);
            if new_f < fval + 0.0001 * step * gd {
                a = new_a;
                b = new_b;
                fval = new_f;
                break;
            }
            step /= 2.0;
        }

        if step < MIN_STEP {
            break;
        }
    }

    Sigmoid { a, b }
}

/// Couple pairwise probabilities into a class distribution.
///
/// `r[i][j]` is the probability that class `i` wins against class `j`, with
/// `r[j][i] == 1 - r[i][j]`. The result is clamped to `[0, 1]` and sums to 1.
pub fn couple(r: &[Vec<f64>]) -> Vec<f64> {
    let k = r.len();
    if k == 0 {
        return Vec::new();
    }
    if k == 1 {
        return vec![1.0];
    }
    if k == 2 {
        return vec![r[0][1], r[1][0]];
    }

    let mut q = vec![vec![0.0; k]; k];
    let mut p = vec![1.0 / k as f64; k];
    let mut qp = vec![0.0; k];

    for t in 0..k {
        for j in 0..t {
            q[t][t] += r[j][t] * r[j][t];
            q[t][j] = q[j][t];
        }
        for j in (t + 1)..k {
            q[t][t] += r[j][t] * r[j][t];
            q[t][j] = -r[j][t] * r[t][j];
        }
    }

    let max_iter = 100.max(k);
    let eps = 0.005 / k as f64;
    for _ in 0..max_iter {
        let mut pqp = 0.0;
        for t in 0..k {
            qp[t] = (0..k).map(|j| q[t][j] * p[j]).sum();
            pqp += p[t] * qp[t];
        }

        let max_error = qp
            .iter()
            .map(|&v| (v - pqp).abs())
            .fold(0.0, f64::max);
        if max_error < eps {
            break;
        }

        for t in 0..k {
            let diff = (-qp[t] + pqp) / q[t][t];
            p[t] += diff;
            pqp = (pqp + diff * (diff * q[t][t] + 2.0 * qp[t])) / (1.0 + diff) / (1.0 + diff);
            for j in 0..k {
                qp[j] = (qp[j] + diff * q[t][j]) / (1.0 + diff);
                p[j] /= 1.0 + diff;
            }
        }
    }

    for v in &mut p {
        *v = v.clamp(0.0, 1.0);
    }
    let total: f64 = p.iter().sum();
    if total > 0.0 {
        for v in &mut p {
            *v /= total;
        }
    } else {
        p = vec![1.0 / k as f64; k];
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairwise_matrix(k: usize, winner: usize, strength: f64) -> Vec<Vec<f64>> {
        let mut r = vec![vec![0.0; k]; k];
        for i in 0..k {
            for j in 0..k {
                if i == j {
                    continue;
                }
                r[i][j] = if i == winner {
                    strength
                } else if j == winner {
                    1.0 - strength
                } else {
                    0.5
                };
            }
        }
        r
    }

    #[test]
    fn test_sigmoid_orientation() {
        let decisions = [-2.0, -1.5, -1.0, 1.0, 1.5, 2.0];
        let labels = [false, false, false, true, true, true];
        let sigmoid = fit_sigmoid(&decisions, &labels);

        assert!(sigmoid.a < 0.0);
        assert!(sigmoid.predict(2.0) > 0.5);
        assert!(sigmoid.predict(-2.0) < 0.5);
    }

    #[test]
    fn test_pairwise_clipping() {
        let sigmoid = Sigmoid { a: -100.0, b: 0.0 };
        assert_eq!(sigmoid.pairwise(100.0), 1.0 - MIN_PROB);
        assert_eq!(sigmoid.pairwise(-100.0), MIN_PROB);
    }

    #[test]
    fn test_couple_two_classes() {
        let r = vec![vec![0.0, 0.8], vec![0.2, 0.0]];
        assert_eq!(couple(&r), vec![0.8, 0.2]);
    }

    #[test]
    fn test_couple_distribution() {
        let p = couple(&pairwise_matrix(4, 2, 0.9));
        let total: f64 = p.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));

        let best = p
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(best, Some(2));
    }

    #[test]
    fn test_couple_uniform() {
        let p = couple(&pairwise_matrix(3, 0, 0.5));
        for v in p {
            assert!((v - 1.0 / 3.0).abs() < 1e-6);
        }
    }
}
