//! Configuration for clause segmentation, preprocessing and model training.
//!
//! Every section deserializes from a partial JSON document; keys that are
//! missing take their defaults.
//!
//! ```
//! use lease_clause::config::LeaseConfig;
//!
//! let config = LeaseConfig::from_json_str(r#"{ "segmenter": { "min_length": 30 } }"#).unwrap();
//! assert_eq!(config.segmenter.min_length, 30);
//! assert_eq!(config.model.max_features, 5000);
//! ```

use crate::error::{Error, Result};
use crate::ml::kernel::{Gamma, KernelType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default minimum clause length in characters.
pub const DEFAULT_MIN_LENGTH: usize = 20;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseConfig {
    /// Clause segmentation options
    pub segmenter: SegmenterConfig,
    /// Text cleaning options applied before feature extraction
    pub preprocessor: PreprocessorConfig,
    /// Feature extractor and classifier hyperparameters
    pub model: ModelConfig,
    /// File locations used when loading or training a model
    pub paths: ModelPaths,
}

impl LeaseConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Replace the segmenter section.
    pub fn with_segmenter(mut self, segmenter: SegmenterConfig) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Replace the preprocessor section.
    pub fn with_preprocessor(mut self, preprocessor: PreprocessorConfig) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Replace the model section.
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.segmenter.validate()?;
        self.model.validate()
    }
}

/// Clause segmentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Clauses shorter than this many characters are dropped
    pub min_length: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl SegmenterConfig {
    /// Set the minimum clause length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(Error::InvalidConfig("min_length must be at least 1".into()));
        }
        Ok(())
    }
}

/// Text cleaning toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Fold to lowercase
    pub lowercase: bool,
    /// Strip ASCII punctuation
    pub remove_punctuation: bool,
    /// Strip digit runs
    pub remove_numbers: bool,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_punctuation: true,
            remove_numbers: false,
        }
    }
}

impl PreprocessorConfig {
    /// Enable or disable lowercasing.
    pub fn with_lowercase(mut self, enable: bool) -> Self {
        self.lowercase = enable;
        self
    }

    /// Enable or disable punctuation removal.
    pub fn with_remove_punctuation(mut self, enable: bool) -> Self {
        self.remove_punctuation = enable;
        self
    }

    /// Enable or disable digit removal.
    pub fn with_remove_numbers(mut self, enable: bool) -> Self {
        self.remove_numbers = enable;
        self
    }
}

/// Feature extractor and classifier hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// SVM kernel
    pub kernel: KernelType,
    /// Regularization strength
    #[serde(rename = "C", alias = "c")]
    pub c: f64,
    /// Kernel coefficient for rbf, poly and sigmoid
    pub gamma: Gamma,
    /// Polynomial kernel degree
    pub degree: u32,
    /// Independent term for poly and sigmoid kernels
    pub coef0: f64,
    /// Vocabulary cap
    pub max_features: usize,
    /// Smallest and largest n-gram length
    pub ngram_range: (usize, usize),
    /// Minimum document count for a term
    pub min_df: usize,
    /// Maximum document frequency as a fraction of the corpus
    pub max_df: f64,
    /// Solver stopping tolerance
    pub tol: f64,
    /// Seed for every shuffle performed during training
    pub random_seed: u64,
    /// Internal folds used to calibrate probabilities
    pub probability_folds: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kernel: KernelType::Rbf,
            c: 1.0,
            gamma: Gamma::Scale,
            degree: 3,
            coef0: 0.0,
            max_features: 5000,
            ngram_range: (1, 2),
            min_df: 1,
            max_df: 0.95,
            tol: 1e-3,
            random_seed: 42,
            probability_folds: 5,
        }
    }
}

impl ModelConfig {
    /// Set the kernel.
    pub fn with_kernel(mut self, kernel: KernelType) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the regularization strength.
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set the kernel coefficient.
    pub fn with_gamma(mut self, gamma: Gamma) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the vocabulary cap.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Check hyperparameters for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !(self.c > 0.0) {
            return Err(Error::InvalidConfig(format!("C must be positive, got {}", self.c)));
        }
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".into()));
        }
        if self.min_df == 0 {
            return Err(Error::InvalidConfig("min_df must be at least 1".into()));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        let (low, high) = self.ngram_range;
        if low == 0 || low > high {
            return Err(Error::InvalidConfig(format!(
                "invalid ngram_range ({}, {})",
                low, high
            )));
        }
        if !(self.tol > 0.0) {
            return Err(Error::InvalidConfig("tol must be positive".into()));
        }
        if let Gamma::Value(g) = self.gamma {
            if !(g > 0.0) {
                return Err(Error::InvalidConfig(format!("gamma must be positive, got {}", g)));
            }
        }
        if self.probability_folds < 2 {
            return Err(Error::InvalidConfig("probability_folds must be at least 2".into()));
        }
        Ok(())
    }
}

/// File locations for the model lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    /// Saved model artifact
    pub model: PathBuf,
    /// Training dataset (file or folder)
    pub train_data: PathBuf,
    /// Label id-to-name mapping file
    pub mapping: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("lease_model.json"),
            train_data: PathBuf::from("test_data"),
            mapping: PathBuf::from("data_mapping/data_mapping.json"),
        }
    }
}
