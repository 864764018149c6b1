//! Clause segmentation.
//!
//! Splits normalized lease text into candidate clauses, one classification
//! unit each. Paragraph rules come from [`rules`]; short candidates are
//! dropped.
//!
//! ## Example
//!
//! ```
//! use lease_clause::segment::ClauseSegmenter;
//!
//! let segmenter = ClauseSegmenter::new(20);
//! let clauses = segmenter.split_into_clauses(
//!     "1. Rent shall be due monthly.\n\nThis is a long enough sentence about pets being disallowed on premises.",
//! );
//! assert_eq!(clauses.len(), 2);
//! assert_eq!(clauses[0], "1. Rent shall be due monthly.");
//! ```

pub mod keywords;
pub mod rules;

pub use keywords::{filter_by_keywords, DEFAULT_LEASE_KEYWORDS};
pub use rules::SplitStrategy;

use crate::config::{SegmenterConfig, DEFAULT_MIN_LENGTH};
use crate::text::TextNormalizer;
use serde::{Deserialize, Serialize};

/// One candidate lease provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Position within the source document
    pub index: usize,
    /// Clause text
    pub text: String,
}

impl AsRef<str> for Clause {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Splits document text into clauses.
#[derive(Debug, Clone, Copy)]
pub struct ClauseSegmenter {
    min_length: usize,
    normalizer: TextNormalizer,
}

impl Default for ClauseSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

impl ClauseSegmenter {
    /// Create a segmenter that drops clauses shorter than `min_length` characters.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            normalizer: TextNormalizer::new(),
        }
    }

    /// Create a segmenter from configuration.
    pub fn from_config(config: &SegmenterConfig) -> Self {
        Self::new(config.min_length)
    }

    /// Minimum clause length in characters.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Split text into clause strings in reading order.
    ///
    /// The text is normalized first; normalizing already-normalized text is
    /// a no-op, so both raw and normalized input are accepted. Empty input
    /// yields an empty list.
    pub fn split_into_clauses(&self, text: &str) -> Vec<String> {
        let normalized = self.normalizer.normalize(text);
        let mut clauses = Vec::new();

        for paragraph in rules::RE_PARAGRAPH_BREAK.split(&normalized) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            match rules::strategy_for(paragraph) {
                SplitStrategy::WholeParagraph => self.push_if_long(&mut clauses, paragraph),
                SplitStrategy::Sentences => {
                    for sentence in rules::split_sentences(paragraph) {
                        self.push_if_long(&mut clauses, sentence.trim());
                    }
                },
            }
        }

        if clauses.is_empty() {
            clauses = rules::split_on_periods(&normalized)
                .into_iter()
                .filter(|part| self.is_long_enough(part))
                .collect();
        }

        clauses
    }

    /// Split text into indexed clauses.
    pub fn extract_clauses(&self, text: &str) -> Vec<Clause> {
        self.split_into_clauses(text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Clause { index, text })
            .collect()
    }

    fn is_long_enough(&self, candidate: &str) -> bool {
        candidate.chars().count() >= self.min_length
    }

    fn push_if_long(&self, clauses: &mut Vec<String>, candidate: &str) {
        if self.is_long_enough(candidate) {
            clauses.push(candidate.to_string());
        }
    }
}
