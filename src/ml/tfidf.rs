//! TF-IDF feature extraction.
//!
//! Documents are tokenized into lowercase word tokens of two or more word
//! characters, English stop words are dropped, and contiguous n-grams are
//! counted. Terms are weighted by their smoothed inverse document frequency
//! and each document vector is scaled to unit length.

use super::sparse::SparseVector;
use super::stop_words::is_stop_word;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    /// Regex for word tokens of at least two characters
    static ref RE_TOKEN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Vectorizer hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfParams {
    /// Vocabulary cap
    pub max_features: usize,
    /// Smallest and largest n-gram length
    pub ngram_range: (usize, usize),
    /// Minimum document count for a term
    pub min_df: usize,
    /// Maximum document fraction for a term
    pub max_df: f64,
    /// Drop English stop words before building n-grams
    pub stop_words: bool,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for TfidfParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            max_features: config.max_features,
            ngram_range: config.ngram_range,
            min_df: config.min_df,
            max_df: config.max_df,
            stop_words: true,
        }
    }
}

/// Term-frequency × inverse-document-frequency vectorizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: TfidfParams,
    /// Term → column, in lexicographic term order
    vocabulary: IndexMap<String, usize>,
    /// Inverse document frequency per column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(params: TfidfParams) -> Self {
        Self {
            params,
            vocabulary: IndexMap::new(),
            idf: Vec::new(),
        }
    }

    /// Hyperparameters.
    pub fn params(&self) -> &TfidfParams {
        &self.params
    }

    /// Fitted vocabulary.
    pub fn vocabulary(&self) -> &IndexMap<String, usize> {
        &self.vocabulary
    }

    /// Fitted idf weights, indexed by column.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Split a document into its n-gram terms.
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let lower = doc.to_lowercase();
        let tokens: Vec<&str> = RE_TOKEN
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !(self.params.stop_words && is_stop_word(t)))
            .collect();

        let (min_n, max_n) = self.params.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Learn vocabulary and idf weights.
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<()> {
        let n_docs = docs.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_count: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let mut seen: HashMap<String, usize> = HashMap::new();
            for term in self.analyze(doc.as_ref()) {
                *seen.entry(term).or_insert(0) += 1;
            }
            for (term, count) in seen {
                *term_count.entry(term.clone()).or_insert(0) += count;
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(Error::Training(
                "empty vocabulary; perhaps the documents only contain stop words".to_string(),
            ));
        }

        let max_doc_count = self.params.max_df * n_docs as f64;
        if max_doc_count < self.params.min_df as f64 {
            return Err(Error::Training(
                "max_df corresponds to fewer documents than min_df".to_string(),
            ));
        }

        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.params.min_df && (*df as f64) <= max_doc_count)
            .collect();
        if kept.is_empty() {
            return Err(Error::Training(
                "After pruning, no terms remain. Try a lower min_df or a higher max_df."
                    .to_string(),
            ));
        }

        if kept.len() > self.params.max_features {
            // Highest corpus count first, ties to the smaller term
            kept.sort_by(|a, b| term_count[&b.0].cmp(&term_count[&a.0]).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(self.params.max_features);
        }
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let n = n_docs as f64;
        self.idf = kept
            .iter()
            .map(|(_, df)| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(column, (term, _))| (term, column))
            .collect();

        Ok(())
    }

    /// Vectorize one document. Unknown terms are ignored.
    pub fn transform(&self, doc: &str) -> Result<SparseVector> {
        if !self.is_fitted() {
            return Err(Error::NotFitted("Vectorizer must be fitted before transform."));
        }

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(doc) {
            if let Some(&column) = self.vocabulary.get(&term) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();
        let mut vector = SparseVector::from_pairs(self.n_features(), pairs);
        vector.l2_normalize();
        Ok(vector)
    }

    /// Fit, then vectorize every training document.
    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<Vec<SparseVector>> {
        self.fit(docs)?;
        docs.iter().map(|d| self.transform(d.as_ref())).collect()
    }
}
