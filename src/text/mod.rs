//! Text cleanup for PDF-extracted lease text.
//!
//! - [`normalizer`]: undo PDF line-wrap artifacts before segmentation
//! - [`preprocessor`]: canonicalize clause text before feature extraction

pub mod normalizer;
pub mod preprocessor;

pub use normalizer::TextNormalizer;
pub use preprocessor::TextPreprocessor;
