//! Multi-class kernel support vector classifier with probability outputs.
//!
//! One binary machine is trained per pair of classes (one-vs-one). For each
//! pair a sigmoid is fitted on decision values obtained by internal
//! cross-validation, and at prediction time the calibrated pairwise
//! probabilities are coupled into one distribution over all classes.

use super::kernel::{Gamma, Kernel, KernelType};
use super::platt::{self, Sigmoid};
use super::smo;
use super::sparse::SparseVector;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classifier hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmParams {
    /// Kernel family
    pub kernel: KernelType,
    /// Regularization strength
    pub c: f64,
    /// Kernel coefficient
    pub gamma: Gamma,
    /// Polynomial degree
    pub degree: u32,
    /// Independent kernel term
    pub coef0: f64,
    /// Solver tolerance
    pub tol: f64,
    /// Folds used to collect decision values for calibration
    pub probability_folds: usize,
    /// Seed for the calibration shuffle
    pub random_seed: u64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for SvmParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            kernel: config.kernel,
            c: config.c,
            gamma: config.gamma,
            degree: config.degree,
            coef0: config.coef0,
            tol: config.tol,
            probability_folds: config.probability_folds,
            random_seed: config.random_seed,
        }
    }
}

/// Binary machine separating `classes[positive]` (+1) from
/// `classes[negative]` (-1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseMachine {
    /// Index of the +1 class
    pub positive: usize,
    /// Index of the -1 class
    pub negative: usize,
    /// Positions in the shared support-vector store
    pub support: Vec<usize>,
    /// `alpha_i * y_i` for each support vector
    pub coef: Vec<f64>,
    /// Bias
    pub rho: f64,
    /// Calibration of this pair's decision values
    pub sigmoid: Sigmoid,
}

impl PairwiseMachine {
    fn decision(&self, kernel_values: &[f64]) -> f64 {
        self.support
            .iter()
            .zip(&self.coef)
            .map(|(&s, &c)| c * kernel_values[s])
            .sum::<f64>()
            - self.rho
    }
}

/// State learned by `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel {
    /// Sorted distinct labels
    pub classes: Vec<String>,
    /// Kernel with resolved gamma
    pub kernel: Kernel,
    /// Support vectors shared by all machines
    pub support_vectors: Vec<SparseVector>,
    /// One machine per class pair, in `(0,1), (0,2), .., (1,2), ..` order
    pub machines: Vec<PairwiseMachine>,
}

/// One-vs-one kernel classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SvmClassifier {
    params: SvmParams,
    model: Option<FittedModel>,
}

impl SvmClassifier {
    /// Create an unfitted classifier.
    pub fn new(params: SvmParams) -> Self {
        Self {
            params,
            model: None,
        }
    }

    /// Hyperparameters.
    pub fn params(&self) -> &SvmParams {
        &self.params
    }

    /// Fitted state, if any.
    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Sorted class labels; empty before `fit`.
    pub fn classes(&self) -> &[String] {
        self.model.as_ref().map_or(&[][..], |m| m.classes.as_slice())
    }

    /// Train on feature vectors and their labels.
    ///
    /// Replaces any previous state. Needs at least two distinct labels.
    pub fn fit<L: AsRef<str>>(&mut self, x: &[SparseVector], y: &[L]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::LengthMismatch {
                texts: x.len(),
                labels: y.len(),
            });
        }

        let mut by_class: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, label) in y.iter().enumerate() {
            by_class.entry(label.as_ref().to_string()).or_default().push(i);
        }
        if by_class.len() < 2 {
            return Err(Error::Training(format!(
                "The number of classes has to be greater than one; got {} class",
                by_class.len()
            )));
        }

        let n_features = x.first().map_or(0, |v| v.dim);
        let kernel = Kernel {
            kind: self.params.kernel,
            gamma: self.params.gamma.resolve(x, n_features),
            degree: self.params.degree,
            coef0: self.params.coef0,
        };
        let gram = gram_matrix(&kernel, x);

        let classes: Vec<String> = by_class.keys().cloned().collect();
        let members: Vec<Vec<usize>> = by_class.into_values().collect();
        let mut rng = StdRng::seed_from_u64(self.params.random_seed);

        // Sample index → position in the shared support-vector store
        let mut store: BTreeMap<usize, usize> = BTreeMap::new();
        let mut raw_machines = Vec::new();

        for positive in 0..classes.len() {
            for negative in (positive + 1)..classes.len() {
                let samples: Vec<usize> = {
                    let mut s: Vec<usize> =
                        members[positive].iter().chain(&members[negative]).copied().collect();
                    s.sort_unstable();
                    s
                };
                let labels: Vec<f64> = samples
                    .iter()
                    .map(|&i| if members[positive].binary_search(&i).is_ok() { 1.0 } else { -1.0 })
                    .collect();
                let sub_gram = submatrix(&gram, &samples, &samples);

                let sigmoid = self.calibrate(&sub_gram, &labels, &mut rng);
                let solution = smo::solve(&sub_gram, &labels, self.params.c, self.params.tol);

                let mut support = Vec::new();
                let mut coef = Vec::new();
                for (k, &alpha) in solution.alpha.iter().enumerate() {
                    if alpha > 0.0 {
                        support.push(samples[k]);
                        coef.push(alpha * labels[k]);
                    }
                }
                for &sample in &support {
                    let next = store.len();
                    store.entry(sample).or_insert(next);
                }

                raw_machines.push(PairwiseMachine {
                    positive,
                    negative,
                    support,
                    coef,
                    rho: solution.rho,
                    sigmoid,
                });
            }
        }

        let mut support_vectors = vec![SparseVector::default(); store.len()];
        for (&sample, &slot) in &store {
            support_vectors[slot] = x[sample].clone();
        }
        let machines = raw_machines
            .into_iter()
            .map(|mut m| {
                m.support = m.support.iter().map(|s| store[s]).collect();
                m
            })
            .collect();

        self.model = Some(FittedModel {
            classes,
            kernel,
            support_vectors,
            machines,
        });
        Ok(())
    }

    /// Fit the pair's sigmoid on decision values from internal cross-validation.
    fn calibrate(&self, gram: &Array2<f64>, labels: &[f64], rng: &mut StdRng) -> Sigmoid {
        let n = labels.len();
        let folds = self.params.probability_folds.max(2);
        let mut perm: Vec<usize> = (0..n).collect();
        perm.shuffle(rng);

        let mut decisions = vec![0.0; n];
        for fold in 0..folds {
            let start = fold * n / folds;
            let end = (fold + 1) * n / folds;
            let test = &perm[start..end];
            let train: Vec<usize> = perm[..start].iter().chain(&perm[end..]).copied().collect();

            let train_labels: Vec<f64> = train.iter().map(|&i| labels[i]).collect();
            let n_pos = train_labels.iter().filter(|&&l| l > 0.0).count();
            let n_neg = train_labels.len() - n_pos;

            if n_pos == 0 || n_neg == 0 {
                let constant = match (n_pos, n_neg) {
                    (0, 0) => 0.0,
                    (_, 0) => 1.0,
                    _ => -1.0,
                };
                for &i in test {
                    decisions[i] = constant;
                }
                continue;
            }

            let train_gram = submatrix(gram, &train, &train);
            let solution = smo::solve(&train_gram, &train_labels, self.params.c, self.params.tol);
            for &i in test {
                decisions[i] = smo::decision_value(&solution, &train_labels, |k| gram[[train[k], i]]);
            }
        }

        let positive: Vec<bool> = labels.iter().map(|&l| l > 0.0).collect();
        platt::fit_sigmoid(&decisions, &positive)
    }

    /// Class probabilities for one vector, in `classes()` order.
    pub fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or(Error::NotFitted("Classifier must be fitted before prediction."))?;

        let x_norm = x.squared_norm();
        let kernel_values: Vec<f64> = model
            .support_vectors
            .iter()
            .map(|sv| model.kernel.compute_with_norms(sv, sv.squared_norm(), x, x_norm))
            .collect();

        let k = model.classes.len();
        let mut pairwise = vec![vec![0.0; k]; k];
        for machine in &model.machines {
            let p = machine.sigmoid.pairwise(machine.decision(&kernel_values));
            pairwise[machine.positive][machine.negative] = p;
            pairwise[machine.negative][machine.positive] = 1.0 - p;
        }

        Ok(platt::couple(&pairwise))
    }

    /// Most probable label; ties go to the earlier class.
    pub fn predict(&self, x: &SparseVector) -> Result<String> {
        let proba = self.predict_proba(x)?;
        let best = argmax(&proba);
        Ok(self.classes()[best].clone())
    }
}

/// Index of the largest value; the first wins on ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn gram_matrix(kernel: &Kernel, x: &[SparseVector]) -> Array2<f64> {
    let norms: Vec<f64> = x.iter().map(SparseVector::squared_norm).collect();
    let n = x.len();
    let mut gram = Array2::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let value = kernel.compute_with_norms(&x[i], norms[i], &x[j], norms[j]);
            gram[[i, j]] = value;
            gram[[j, i]] = value;
        }
    }
    gram
}

fn submatrix(gram: &Array2<f64>, rows: &[usize], cols: &[usize]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), cols.len()), |(a, b)| gram[[rows[a], cols[b]]])
}
