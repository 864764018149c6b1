//! Lease clause classifier.
//!
//! [`LeaseClauseClassifier`] is the public entry point for training and
//! prediction. Every text passes through the same [`TextPreprocessor`]
//! before reaching the [`ClausePipeline`], at training time and at
//! prediction time.
//!
//! # State
//!
//! A classifier is either unfitted (only [`fit`](LeaseClauseClassifier::fit)
//! is valid) or fitted. [`load`](LeaseClauseClassifier::load) returns a
//! fitted classifier directly. Prediction, evaluation and saving on an
//! unfitted classifier return [`Error::NotFitted`].
//!
//! # Example
//!
//! ```
//! use lease_clause::classifier::LeaseClauseClassifier;
//! use lease_clause::data::sample::sample_data;
//!
//! let data = sample_data();
//! let mut classifier = LeaseClauseClassifier::default();
//! classifier.fit(&data.texts, &data.labels)?;
//!
//! let prediction = classifier.classify_one("The monthly rent is due on the first day of each month.")?;
//! assert_eq!(prediction.label, "rent_payment");
//! # Ok::<(), lease_clause::Error>(())
//! ```

use crate::artifact::{ArtifactConfig, ModelArtifact};
use crate::config::{LeaseConfig, ModelConfig, ModelPaths, PreprocessorConfig};
use crate::data::DataLoader;
use crate::error::{Error, Result};
use crate::ml::metrics::{self, ClassMetrics};
use crate::ml::model_selection::stratified_k_fold;
use crate::ml::svm::argmax;
use crate::ml::ClausePipeline;
use crate::text::TextPreprocessor;
use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Probability per class, in class order.
pub type ClassProbabilities = IndexMap<String, f64>;

/// Classification result for one clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Most probable label
    pub label: String,
    /// Probability of `label`
    pub confidence: f64,
    /// Probability of every known label
    pub distribution: ClassProbabilities,
}

/// Input accepted by the shape-preserving entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    /// A single text
    One(String),
    /// A batch of texts
    Many(Vec<String>),
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::One(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::One(text)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Many(texts)
    }
}

impl From<Vec<&str>> for TextInput {
    fn from(texts: Vec<&str>) -> Self {
        TextInput::Many(texts.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TextInput {
    fn from(texts: &[&str]) -> Self {
        TextInput::Many(texts.iter().map(|t| t.to_string()).collect())
    }
}

impl From<&[String]> for TextInput {
    fn from(texts: &[String]) -> Self {
        TextInput::Many(texts.to_vec())
    }
}

/// Output with the same shape as the [`TextInput`] it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped<T> {
    /// Result for a single text
    One(T),
    /// Results for a batch, in input order
    Many(Vec<T>),
}

impl<T> Shaped<T> {
    /// The single result, if the input was a single text.
    pub fn into_one(self) -> Option<T> {
        match self {
            Shaped::One(v) => Some(v),
            Shaped::Many(_) => None,
        }
    }

    /// All results as a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Shaped::One(v) => vec![v],
            Shaped::Many(v) => v,
        }
    }

    /// Whether the input was a single text.
    pub fn is_one(&self) -> bool {
        matches!(self, Shaped::One(_))
    }
}

/// Result of [`LeaseClauseClassifier::evaluate`].
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Fraction of correct predictions
    pub accuracy: f64,
    /// Row and column order of `confusion_matrix`
    pub labels: Vec<String>,
    /// Metrics per label
    pub per_class: IndexMap<String, ClassMetrics>,
    /// Unweighted mean over labels
    pub macro_avg: ClassMetrics,
    /// Support-weighted mean over labels
    pub weighted_avg: ClassMetrics,
    /// Rows are true labels, columns predicted labels
    pub confusion_matrix: Vec<Vec<usize>>,
    /// Human-readable table
    pub report: String,
}

/// Result of [`LeaseClauseClassifier::cross_validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidationReport {
    /// Accuracy per fold
    pub scores: Vec<f64>,
    /// Mean accuracy
    pub mean: f64,
    /// Population standard deviation of the scores
    pub std: f64,
}

/// Classifier facade: preprocessing, features, model and persistence.
#[derive(Debug, Clone)]
pub struct LeaseClauseClassifier {
    config: ModelConfig,
    preprocessor: TextPreprocessor,
    pipeline: ClausePipeline,
    fitted: bool,
}

impl Default for LeaseClauseClassifier {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl LeaseClauseClassifier {
    /// Create an unfitted classifier with default preprocessing.
    pub fn new(config: ModelConfig) -> Self {
        Self::with_preprocessor(config, PreprocessorConfig::default())
    }

    /// Create an unfitted classifier with explicit preprocessing toggles.
    pub fn with_preprocessor(config: ModelConfig, preprocessor: PreprocessorConfig) -> Self {
        Self {
            pipeline: ClausePipeline::from_config(&config),
            config,
            preprocessor: TextPreprocessor::new(preprocessor),
            fitted: false,
        }
    }

    /// Create an unfitted classifier from a full configuration.
    pub fn from_config(config: &LeaseConfig) -> Self {
        Self::with_preprocessor(config.model.clone(), config.preprocessor)
    }

    /// Model hyperparameters.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Preprocessor applied to every text.
    pub fn preprocessor(&self) -> &TextPreprocessor {
        &self.preprocessor
    }

    /// Sorted class labels; empty before `fit`.
    pub fn classes(&self) -> &[String] {
        self.pipeline.classes()
    }

    /// Whether the classifier can predict.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Train on parallel texts and labels.
    ///
    /// Replaces any previous model. On failure the previous state is kept.
    pub fn fit<T: AsRef<str>, L: AsRef<str>>(&mut self, texts: &[T], labels: &[L]) -> Result<()> {
        if texts.len() != labels.len() {
            return Err(Error::LengthMismatch {
                texts: texts.len(),
                labels: labels.len(),
            });
        }
        self.config.validate()?;

        let cleaned = self.preprocessor.preprocess_batch(texts);
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();

        let mut pipeline = ClausePipeline::from_config(&self.config);
        pipeline.fit(&cleaned, &labels)?;

        self.pipeline = pipeline;
        self.fitted = true;
        Ok(())
    }

    fn ensure_fitted(&self, message: &'static str) -> Result<()> {
        if self.fitted {
            Ok(())
        } else {
            Err(Error::NotFitted(message))
        }
    }

    /// Preprocess one clause, rejecting clauses with no content left.
    fn clean_clause(&self, text: &str) -> Result<String> {
        let cleaned = self.preprocessor.clean_text(text);
        if cleaned.is_empty() {
            return Err(Error::EmptyClause);
        }
        Ok(cleaned)
    }

    fn distribution(&self, proba: Vec<f64>) -> ClassProbabilities {
        self.classes().iter().cloned().zip(proba).collect()
    }

    /// Probability distribution for one clause.
    pub fn predict_proba_one(&self, text: &str) -> Result<ClassProbabilities> {
        self.ensure_fitted("Classifier must be fitted before prediction.")?;
        let cleaned = self.clean_clause(text)?;
        let proba = self.pipeline.predict_proba(&cleaned)?;
        Ok(self.distribution(proba))
    }

    /// Probability distributions for a batch, in input order.
    pub fn predict_proba_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<ClassProbabilities>> {
        texts.iter().map(|t| self.predict_proba_one(t.as_ref())).collect()
    }

    /// Most probable label for one clause.
    pub fn predict_one(&self, text: &str) -> Result<String> {
        Ok(self.classify_one(text)?.label)
    }

    /// Most probable labels for a batch, in input order.
    pub fn predict_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        texts.iter().map(|t| self.predict_one(t.as_ref())).collect()
    }

    /// Label, confidence and full distribution for one clause.
    pub fn classify_one(&self, text: &str) -> Result<Prediction> {
        let distribution = self.predict_proba_one(text)?;
        let values: Vec<f64> = distribution.values().copied().collect();
        let best = argmax(&values);
        let (label, confidence) = distribution
            .get_index(best)
            .map(|(l, p)| (l.clone(), *p))
            .ok_or(Error::NotFitted("Classifier must be fitted before prediction."))?;

        Ok(Prediction {
            label,
            confidence,
            distribution,
        })
    }

    /// Predict labels, answering a single text with a single label and a
    /// batch with a list.
    pub fn predict(&self, input: impl Into<TextInput>) -> Result<Shaped<String>> {
        match input.into() {
            TextInput::One(text) => self.predict_one(&text).map(Shaped::One),
            TextInput::Many(texts) => self.predict_many(&texts).map(Shaped::Many),
        }
    }

    /// Predict distributions with the same shape rule as [`predict`](Self::predict).
    pub fn predict_proba(&self, input: impl Into<TextInput>) -> Result<Shaped<ClassProbabilities>> {
        match input.into() {
            TextInput::One(text) => self.predict_proba_one(&text).map(Shaped::One),
            TextInput::Many(texts) => self.predict_proba_many(&texts).map(Shaped::Many),
        }
    }

    /// Score predictions against true labels.
    ///
    /// Texts that are empty after preprocessing are still predicted from a
    /// zero feature vector rather than rejected.
    pub fn evaluate<T: AsRef<str>, L: AsRef<str>>(
        &self,
        texts: &[T],
        labels: &[L],
    ) -> Result<EvaluationReport> {
        self.ensure_fitted("Classifier must be fitted before evaluation.")?;
        if texts.len() != labels.len() {
            return Err(Error::LengthMismatch {
                texts: texts.len(),
                labels: labels.len(),
            });
        }

        let predictions = self
            .preprocessor
            .preprocess_batch(texts)
            .iter()
            .map(|t| self.pipeline.predict(t))
            .collect::<Result<Vec<_>>>()?;

        let accuracy = metrics::accuracy(labels, &predictions);
        let report_labels = metrics::report_labels(self.classes(), labels, &predictions);
        let confusion_matrix = metrics::confusion_matrix(labels, &predictions, &report_labels);
        let per_class = metrics::per_class_metrics(&report_labels, &confusion_matrix);
        let macro_avg = metrics::macro_average(&per_class);
        let weighted_avg = metrics::weighted_average(&per_class);
        let report = metrics::classification_report(&per_class, accuracy, &macro_avg, &weighted_avg);

        Ok(EvaluationReport {
            accuracy,
            labels: report_labels,
            per_class,
            macro_avg,
            weighted_avg,
            confusion_matrix,
            report,
        })
    }

    /// Stratified k-fold cross-validation on a fresh, unfitted copy.
    ///
    /// `self` is not modified.
    pub fn cross_validate<T: AsRef<str>, L: AsRef<str>>(
        &self,
        texts: &[T],
        labels: &[L],
        folds: usize,
    ) -> Result<CrossValidationReport> {
        if texts.len() != labels.len() {
            return Err(Error::LengthMismatch {
                texts: texts.len(),
                labels: labels.len(),
            });
        }

        let mut scores = Vec::with_capacity(folds);
        for fold in stratified_k_fold(labels, folds, self.config.random_seed)? {
            let (train_texts, train_labels) = select(texts, labels, &fold.train);
            let (test_texts, test_labels) = select(texts, labels, &fold.test);

            let mut model =
                Self::with_preprocessor(self.config.clone(), *self.preprocessor.config());
            model.fit(&train_texts, &train_labels)?;
            scores.push(model.evaluate(&test_texts, &test_labels)?.accuracy);
        }

        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let std = (scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n).sqrt();
        Ok(CrossValidationReport { scores, mean, std })
    }

    /// Write the fitted model to `path` (gzip-compressed for `.gz` paths).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_fitted("Cannot save an unfitted classifier.")?;
        let artifact = ModelArtifact::new(
            ArtifactConfig {
                model: self.config.clone(),
                preprocessor: *self.preprocessor.config(),
            },
            self.pipeline.clone(),
        );
        artifact.write(path)
    }

    /// Load a fitted classifier written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let artifact = ModelArtifact::read(path)?;
        Ok(Self {
            config: artifact.config.model,
            preprocessor: TextPreprocessor::new(artifact.config.preprocessor),
            pipeline: artifact.pipeline,
            fitted: true,
        })
    }

    /// Load the model at `paths.model`, or train one from
    /// `paths.train_data` and save it there.
    ///
    /// The label mapping at `paths.mapping` is applied when the file exists.
    pub fn load_or_train(paths: &ModelPaths, config: &LeaseConfig) -> Result<Self> {
        if paths.model.exists() {
            info!("Loading classifier from {}", paths.model.display());
            let classifier = Self::load(&paths.model)?;
            info!("Classifier loaded with {} classes", classifier.classes().len());
            return Ok(classifier);
        }

        info!(
            "No model at {}; training from {}",
            paths.model.display(),
            paths.train_data.display()
        );
        if !paths.train_data.exists() {
            return Err(Error::NotFound(paths.train_data.clone()));
        }

        let mapping = paths.mapping.exists().then_some(paths.mapping.as_path());
        let dataset = DataLoader::load_with_mapping(&paths.train_data, mapping)?;
        if dataset.is_empty() {
            return Err(Error::Training(format!(
                "no training data found in {}",
                paths.train_data.display()
            )));
        }

        let mut classifier = Self::from_config(config);
        classifier.fit(&dataset.texts, &dataset.labels)?;
        classifier.save(&paths.model)?;
        info!(
            "Classifier trained on {} samples and saved to {}",
            dataset.len(),
            paths.model.display()
        );
        Ok(classifier)
    }
}

fn select<'a, T: AsRef<str>, L: AsRef<str>>(
    texts: &'a [T],
    labels: &'a [L],
    indices: &[usize],
) -> (Vec<&'a str>, Vec<&'a str>) {
    indices
        .iter()
        .map(|&i| (texts[i].as_ref(), labels[i].as_ref()))
        .unzip()
}
