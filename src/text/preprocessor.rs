//! Text cleaning applied to every clause before feature extraction.
//!
//! The same [`TextPreprocessor`] must be used at training time and at
//! prediction time; the classifier stores its configuration in the model
//! artifact for that reason.

use crate::config::PreprocessorConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

lazy_static! {
    /// Regex for whitespace runs
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Regex for digit runs
    static ref RE_DIGITS: Regex = Regex::new(r"\d+").unwrap();
}

/// Deterministic text cleaner.
///
/// # Example
///
/// ```
/// use lease_clause::text::TextPreprocessor;
///
/// let preprocessor = TextPreprocessor::default();
/// assert_eq!(
///     preprocessor.clean_text("  Rent: $1,500   due MONTHLY! "),
///     "rent 1500 due monthly"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextPreprocessor {
    config: PreprocessorConfig,
}

impl TextPreprocessor {
    /// Create a preprocessor with the given toggles.
    pub fn new(config: PreprocessorConfig) -> Self {
        Self { config }
    }

    /// Toggles in effect.
    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Clean a single text.
    pub fn clean_text(&self, text: &str) -> String {
        let mut text = collapse_whitespace(text);

        if self.config.lowercase {
            text = text.to_lowercase();
        }

        if self.config.remove_punctuation {
            text.retain(|c| !c.is_ascii_punctuation());
        }

        if self.config.remove_numbers {
            text = RE_DIGITS.replace_all(&text, "").into_owned();
        }

        collapse_whitespace(&text)
    }

    /// Clean any value through its string representation.
    pub fn clean_value<T: Display>(&self, value: T) -> String {
        self.clean_text(&value.to_string())
    }

    /// Clean a batch of texts element-wise.
    pub fn preprocess_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.clean_text(t.as_ref())).collect()
    }
}

fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}
