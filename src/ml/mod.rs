//! Statistical model for clause classification.
//!
//! Two stages make up the model:
//! - [`tfidf`]: unigram/bigram term weighting into [`SparseVector`]s
//! - [`svm`]: a one-vs-one kernel classifier with calibrated probabilities
//!
//! [`pipeline::ClausePipeline`] wires them together. The solver, kernels and
//! calibration live in their own modules so each can be tested in isolation.
//!
//! # Example
//!
//! ```
//! use lease_clause::config::ModelConfig;
//! use lease_clause::ml::ClausePipeline;
//!
//! let texts: Vec<String> = [
//!     "monthly rent payment is due on the first",
//!     "rent must be paid monthly by check",
//!     "no pets or animals allowed on premises",
//!     "dogs and cats are prohibited pets",
//! ]
//! .iter()
//! .map(|s| s.to_string())
//! .collect();
//! let labels: Vec<String> = ["rent_payment", "rent_payment", "pets", "pets"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let mut pipeline = ClausePipeline::from_config(&ModelConfig::default());
//! pipeline.fit(&texts, &labels)?;
//! assert_eq!(pipeline.classes(), &["pets".to_string(), "rent_payment".to_string()]);
//! # Ok::<(), lease_clause::Error>(())
//! ```

pub mod kernel;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod platt;
pub mod smo;
pub mod sparse;
pub mod stop_words;
pub mod svm;
pub mod tfidf;

pub use kernel::{Gamma, Kernel, KernelType};
pub use pipeline::{ClassifierStage, ClausePipeline, FeatureStage};
pub use sparse::SparseVector;
pub use svm::SvmClassifier;
pub use tfidf::TfidfVectorizer;
