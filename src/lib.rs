// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Lease Clause
//!
//! Clause segmentation and classification for lease agreements.
//!
//! ## Core Features
//!
//! - **Normalization**: Undo PDF line-wrap artifacts (hyphenated wraps, soft breaks)
//! - **Segmentation**: Rule-based clause splitting with numbered-section detection
//! - **Features**: TF-IDF over word n-grams with English stop words
//! - **Classification**: Kernel SVM (SMO solver) with Platt-calibrated probabilities
//! - **Persistence**: Versioned JSON model artifacts, optionally gzip-compressed
//! - **Datasets**: JSON, CSV and spreadsheet training data with id → name label mapping
//! - **Documents**: Parallel per-clause classification grouped by clause type
//!
//! ## Quick Start
//!
//! ```
//! use lease_clause::data::sample::sample_data;
//! use lease_clause::{LeaseClauseClassifier, ModelConfig};
//!
//! # fn main() -> lease_clause::Result<()> {
//! let data = sample_data();
//! let mut classifier = LeaseClauseClassifier::new(ModelConfig::default());
//! classifier.fit(&data.texts, &data.labels)?;
//!
//! let prediction = classifier.classify_one("The monthly rent is due on the first day of each month.")?;
//! println!("{} ({:.2})", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Text cleanup
pub mod text;

// Clause segmentation
pub mod segment;

// Feature extraction and the SVM
pub mod ml;

// Classifier facade and persistence
pub mod artifact;
pub mod classifier;

// Training data
pub mod data;

// Whole-document classification
pub mod document;

// Re-exports
pub use classifier::{
    ClassProbabilities, CrossValidationReport, EvaluationReport, LeaseClauseClassifier,
    Prediction, Shaped, TextInput,
};
pub use config::{LeaseConfig, ModelConfig, ModelPaths, PreprocessorConfig, SegmenterConfig};
pub use data::{DataLoader, Dataset, LabelMapping};
pub use document::{classify_document, DocumentClassification};
pub use error::{Error, Result};
pub use segment::{Clause, ClauseSegmenter};
pub use text::{TextNormalizer, TextPreprocessor};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
