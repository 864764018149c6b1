//! Pattern tables that drive clause segmentation.
//!
//! A paragraph is matched against [`PARAGRAPH_RULES`] in order; the first
//! rule whose pattern matches decides how the paragraph is split. Paragraphs
//! that match no rule are split into sentences.

use lazy_static::lazy_static;
use regex::Regex;

/// How a paragraph becomes clause candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// The whole paragraph is one candidate
    WholeParagraph,
    /// Each sentence is a candidate
    Sentences,
}

/// A named pattern mapped to a split strategy.
#[derive(Debug)]
pub struct ParagraphRule {
    /// Rule name, for diagnostics
    pub name: &'static str,
    /// Pattern tested against the start of the trimmed paragraph
    pub pattern: Regex,
    /// Strategy applied when the pattern matches
    pub strategy: SplitStrategy,
}

/// Strategy for paragraphs that match no rule.
pub const DEFAULT_STRATEGY: SplitStrategy = SplitStrategy::Sentences;

lazy_static! {
    /// Ordered paragraph rules.
    ///
    /// Numbered or lettered sections (`1.`, `1.1`, `(a)`, `a)`) are single
    /// coherent provisions and are never split further.
    pub static ref PARAGRAPH_RULES: Vec<ParagraphRule> = vec![ParagraphRule {
        name: "section_marker",
        pattern: Regex::new(r"(?i)^(\d+\.?\d*\.?|\([a-z0-9]+\)|[a-z]\))\s*").unwrap(),
        strategy: SplitStrategy::WholeParagraph,
    }];

    /// Regex for paragraph separators in normalized text
    pub static ref RE_PARAGRAPH_BREAK: Regex = Regex::new(r"\n\n+").unwrap();

    /// Regex for a sentence boundary: terminal punctuation, whitespace, then
    /// an uppercase ASCII letter
    static ref RE_SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]\s+[A-Z]").unwrap();

    /// Regex for the fallback split on periods
    static ref RE_PERIOD_SPLIT: Regex = Regex::new(r"\.\s+").unwrap();
}

/// Pick the split strategy for a trimmed paragraph.
pub fn strategy_for(paragraph: &str) -> SplitStrategy {
    PARAGRAPH_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(paragraph))
        .map(|rule| rule.strategy)
        .unwrap_or(DEFAULT_STRATEGY)
}

/// Split a paragraph into sentences.
///
/// Punctuation stays with the sentence it ends. A boundary needs an
/// uppercase letter after the whitespace, so `"No. 5"` or `"3.5 acres"` do
/// not split, while `"Ave. Jones"` does.
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in RE_SENTENCE_BOUNDARY.find_iter(paragraph) {
        // Punctuation and the uppercase letter are both single-byte ASCII
        let end = m.start() + 1;
        sentences.push(&paragraph[start..end]);
        start = m.end() - 1;
    }
    sentences.push(&paragraph[start..]);

    sentences
}

/// Split text on `". "` for documents the paragraph pass cannot split.
///
/// Each fragment is trimmed and gets a trailing period if it lost one.
pub fn split_on_periods(text: &str) -> Vec<String> {
    RE_PERIOD_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.ends_with('.') {
                part.to_string()
            } else {
                format!("{}.", part)
            }
        })
        .collect()
}
