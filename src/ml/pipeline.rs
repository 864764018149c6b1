//! Two-stage model: feature extraction followed by classification.

use super::sparse::SparseVector;
use super::svm::{argmax, SvmClassifier, SvmParams};
use super::tfidf::{TfidfParams, TfidfVectorizer};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Turns text into feature vectors.
pub trait FeatureStage {
    /// Learn the feature space from training documents.
    fn fit(&mut self, docs: &[String]) -> Result<()>;

    /// Map one document into the fitted feature space.
    fn transform(&self, doc: &str) -> Result<SparseVector>;

    /// Whether `fit` has completed.
    fn is_fitted(&self) -> bool;
}

/// Maps feature vectors to class probabilities.
pub trait ClassifierStage {
    /// Train on vectors and labels.
    fn fit(&mut self, x: &[SparseVector], labels: &[String]) -> Result<()>;

    /// Probabilities in `classes()` order.
    fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f64>>;

    /// Sorted class labels.
    fn classes(&self) -> &[String];

    /// Whether `fit` has completed.
    fn is_fitted(&self) -> bool;
}

impl FeatureStage for TfidfVectorizer {
    fn fit(&mut self, docs: &[String]) -> Result<()> {
        TfidfVectorizer::fit(self, docs)
    }

    fn transform(&self, doc: &str) -> Result<SparseVector> {
        TfidfVectorizer::transform(self, doc)
    }

    fn is_fitted(&self) -> bool {
        TfidfVectorizer::is_fitted(self)
    }
}

impl ClassifierStage for SvmClassifier {
    fn fit(&mut self, x: &[SparseVector], labels: &[String]) -> Result<()> {
        SvmClassifier::fit(self, x, labels)
    }

    fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f64>> {
        SvmClassifier::predict_proba(self, x)
    }

    fn classes(&self) -> &[String] {
        SvmClassifier::classes(self)
    }

    fn is_fitted(&self) -> bool {
        SvmClassifier::is_fitted(self)
    }
}

/// Feature stage feeding a classifier stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClausePipeline<F = TfidfVectorizer, C = SvmClassifier> {
    /// Text → vector
    pub feature_stage: F,
    /// Vector → probabilities
    pub classifier_stage: C,
}

impl ClausePipeline {
    /// Unfitted TF-IDF + SVM pipeline configured from model settings.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            feature_stage: TfidfVectorizer::new(TfidfParams::from(config)),
            classifier_stage: SvmClassifier::new(SvmParams::from(config)),
        }
    }
}

impl<F: FeatureStage, C: ClassifierStage> ClausePipeline<F, C> {
    /// Build from explicit stages.
    pub fn new(feature_stage: F, classifier_stage: C) -> Self {
        Self {
            feature_stage,
            classifier_stage,
        }
    }

    /// Fit both stages on preprocessed texts.
    pub fn fit(&mut self, texts: &[String], labels: &[String]) -> Result<()> {
        if texts.len() != labels.len() {
            return Err(Error::LengthMismatch {
                texts: texts.len(),
                labels: labels.len(),
            });
        }
        self.feature_stage.fit(texts)?;
        let x = texts
            .iter()
            .map(|t| self.feature_stage.transform(t))
            .collect::<Result<Vec<_>>>()?;
        self.classifier_stage.fit(&x, labels)
    }

    /// Probabilities for one preprocessed text, in `classes()` order.
    pub fn predict_proba(&self, text: &str) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(Error::NotFitted("Classifier must be fitted before prediction."));
        }
        let x = self.feature_stage.transform(text)?;
        self.classifier_stage.predict_proba(&x)
    }

    /// Most probable label for one preprocessed text.
    pub fn predict(&self, text: &str) -> Result<String> {
        let proba = self.predict_proba(text)?;
        Ok(self.classes()[argmax(&proba)].clone())
    }

    /// Sorted class labels; empty before `fit`.
    pub fn classes(&self) -> &[String] {
        self.classifier_stage.classes()
    }

    /// Whether both stages are fitted.
    pub fn is_fitted(&self) -> bool {
        self.feature_stage.is_fitted() && self.classifier_stage.is_fitted()
    }
}
