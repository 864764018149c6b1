//! Line-break normalization for text extracted from PDF pages.
//!
//! PDF text arrives wrapped at the layout width of the page: words are split
//! with hyphens, sentences continue on the next line and paragraphs are only
//! visible as blank lines. This module undoes those artifacts so that
//! sentence and paragraph boundaries carry meaning again.
//!
//! # Stages
//!
//! The stages run in a fixed order, listed in [`NORMALIZATION_STAGES`]:
//!
//! 1. Unify line endings and trim horizontal whitespace at line edges
//! 2. Drop any hyphen that ends a line along with the break (`"wrap-\nped"` → `"wrapped"`)
//! 3. Replace soft newlines (mid-sentence wraps) with a space
//! 4. Collapse runs of spaces
//! 5. Collapse blank-line runs into a single paragraph separator
//! 6. Join lines into units that end in terminal punctuation
//!
//! The output keeps `"\n"` between sentence units and `"\n\n"` between
//! paragraphs. Normalizing already-normalized text returns it unchanged.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for horizontal whitespace at the end of a line
    static ref RE_TRAILING_WS: Regex = Regex::new(r"(?m)[^\S\n]+$").unwrap();

    /// Regex for horizontal whitespace at the start of a line
    static ref RE_LEADING_WS: Regex = Regex::new(r"(?m)^[^\S\n]+").unwrap();

    /// Regex for runs of spaces
    static ref RE_SPACE_RUN: Regex = Regex::new(r" {2,}").unwrap();

    /// Regex for two or more newlines with optional whitespace between them
    static ref RE_BLANK_LINES: Regex = Regex::new(r"\n\s*\n").unwrap();
}

/// Characters that keep a preceding newline as a real line break.
///
/// Uppercase letters and digits are checked separately.
pub const HARD_BREAK_STARTERS: &[char] = &[
    '(', ')', '[', ']', '-', '*', '\u{2022}', '\u{25E6}', '\u{25AA}', '\u{2023}', '\u{25CF}',
    '\u{2013}', '\u{2014}',
];

/// Characters that end a sentence unit during line joining.
pub const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', ':', ';'];

/// A single named normalization step.
pub type Stage = (&'static str, fn(&str) -> String);

/// Normalization stages in execution order.
pub const NORMALIZATION_STAGES: &[Stage] = &[
    ("unify_line_edges", unify_line_edges),
    ("join_hyphenated_breaks", join_hyphenated_breaks),
    ("collapse_soft_newlines", collapse_soft_newlines),
    ("collapse_spaces", collapse_spaces),
    ("collapse_blank_lines", collapse_blank_lines),
    ("join_lines", join_lines),
];

/// Joins PDF-broken lines into sentences and paragraphs.
///
/// # Example
///
/// ```
/// use lease_clause::text::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// let text = "The tenant is respon-\nsible for all\nrepairs.\n\nRent is due monthly.";
/// assert_eq!(
///     normalizer.normalize(text),
///     "The tenant is responsible for all repairs.\n\nRent is due monthly."
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize raw page text.
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        NORMALIZATION_STAGES
            .iter()
            .fold(text.to_string(), |acc, (_, stage)| stage(&acc))
    }

    /// Normalize raw bytes, replacing invalid UTF-8 sequences.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> String {
        self.normalize(&String::from_utf8_lossy(bytes))
    }
}

/// Check whether a newline followed by `c` is a real line break.
pub fn is_hard_break_starter(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || HARD_BREAK_STARTERS.contains(&c)
}

/// Check whether a text unit ends in terminal punctuation.
pub fn ends_with_terminal(text: &str) -> bool {
    text.trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| TERMINAL_PUNCTUATION.contains(&c))
}

fn unify_line_edges(text: &str) -> String {
    let unified = text
        .replace("\r\n", "\n")
        .replace(['\r', '\u{000C}'], "\n");
    let trimmed = RE_TRAILING_WS.replace_all(&unified, "");
    RE_LEADING_WS.replace_all(&trimmed, "").into_owned()
}

/// Remove every hyphen (hard or soft) that ends a line, together with the
/// line break.
///
/// Removal can expose another hyphen at the end of the line, so the rule is
/// applied until no line ends in one.
fn join_hyphenated_breaks(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        if c != '\n' {
            result.push(c);
            continue;
        }

        let kept = result.trim_end_matches(is_horizontal_space).len();
        result.truncate(kept);
        if result.ends_with(['-', '\u{00AD}']) {
            result.pop();
        } else {
            result.push('\n');
        }
    }

    result
}

fn is_horizontal_space(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

/// Replace newlines that continue a sentence with a space.
///
/// A newline is soft unless it is adjacent to another newline or is followed
/// by an uppercase letter, a digit, a bracket, a bullet or a dash.
fn collapse_soft_newlines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c != '\n' {
            result.push(c);
            continue;
        }

        // Both newlines of a blank line stay, so "\n\n" is always a paragraph break
        let after_newline = i > 0 && chars[i - 1] == '\n';
        let hard = after_newline
            || chars
                .get(i + 1)
                .is_some_and(|&next| next == '\n' || is_hard_break_starter(next));

        result.push(if hard { '\n' } else { ' ' });
    }

    result
}

fn collapse_spaces(text: &str) -> String {
    RE_SPACE_RUN.replace_all(text, " ").into_owned()
}

fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_LINES.replace_all(text, "\n\n").into_owned()
}

/// Accumulate lines into units. A line continues the current unit unless the
/// unit already ends in terminal punctuation; blank lines end a paragraph.
fn join_lines(text: &str) -> String {
    let mut paragraphs: Vec<Vec<String>> = Vec::new();
    let mut units: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for line in text.split('\n') {
        let line = line.trim();

        if line.is_empty() {
            if !buffer.is_empty() {
                units.push(std::mem::take(&mut buffer));
            }
            if !units.is_empty() {
                paragraphs.push(std::mem::take(&mut units));
            }
            continue;
        }

        if buffer.is_empty() {
            buffer.push_str(line);
        } else if ends_with_terminal(&buffer) {
            units.push(std::mem::replace(&mut buffer, line.to_string()));
        } else {
            buffer.push(' ');
            buffer.push_str(line);
        }
    }

    if !buffer.is_empty() {
        units.push(buffer);
    }
    if !units.is_empty() {
        paragraphs.push(units);
    }

    paragraphs
        .iter()
        .map(|units| units.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        TextNormalizer::new().normalize(text)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_no_newlines_unchanged() {
        assert_eq!(normalize("Rent is due  monthly."), "Rent is due monthly.");
    }

    #[test]
    fn test_hyphenated_break() {
        assert_eq!(normalize("respon-\nsible"), "responsible");
        assert_eq!(normalize("busi\u{00AD}\nness"), "business");
    }

    #[test]
    fn test_any_line_final_hyphen_is_joined() {
        assert_eq!(normalize("Unit 4-\nB"), "Unit 4B");
        assert_eq!(normalize("pre-\n2020 rent"), "pre2020 rent");
        assert_eq!(normalize("self-\nemployed"), "selfemployed");
        assert_eq!(normalize("Rent -  \ndue"), "Rent due");
    }

    #[test]
    fn test_exposed_hyphen_is_joined_too() {
        assert_eq!(join_hyphenated_breaks("a- -\n\n\nB"), "a\nB");
        assert_eq!(join_hyphenated_breaks("a--\n\nB"), "aB");
        assert_eq!(normalize("a- -\n\n\nB"), "a B");
    }

    #[test]
    fn test_soft_newline_becomes_space() {
        assert_eq!(normalize("The tenant shall\npay rent."), "The tenant shall pay rent.");
    }

    #[test]
    fn test_hard_newline_before_bullet() {
        assert_eq!(
            normalize("Duties include:\n\u{2022} mowing\n\u{2022} cleaning"),
            "Duties include:\n\u{2022} mowing \u{2022} cleaning"
        );
    }

    #[test]
    fn test_line_without_terminal_punctuation_joins() {
        assert_eq!(normalize("Section One\nRent is due."), "Section One Rent is due.");
    }

    #[test]
    fn test_terminal_punctuation_splits_units() {
        assert_eq!(normalize("Rent is due.\nDeposit is held."), "Rent is due.\nDeposit is held.");
    }

    #[test]
    fn test_paragraphs_preserved() {
        assert_eq!(normalize("First.\n\n\n\nSecond."), "First.\n\nSecond.");
        assert_eq!(normalize("First.\n  \n\nsecond."), "First.\n\nsecond.");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(normalize("Rent is\r\ndue.\r\n\r\nPets."), "Rent is due.\n\nPets.");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "1. Rent shall be due monthly.\n\nThis is a long enough sentence.",
            "The tenant is respon-\nsible for\nrepairs.\nLandlord: none\n\n(a) item one\n- dash",
            "A.\n\n and more\nand more.\n\n\n",
            "x -\n\nY",
            "a- -\n\n\nB",
            "Unit 4-\nB and\u{00A0}-\u{00A0}\n\nC.",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_stage_order() {
        let names: Vec<&str> = NORMALIZATION_STAGES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&"unify_line_edges"));
        assert_eq!(names.last(), Some(&"join_lines"));
    }

    #[test]
    fn test_normalize_bytes_lossy() {
        let result = TextNormalizer::new().normalize_bytes(b"Rent\xFF is due.");
        assert!(result.starts_with("Rent"));
        assert!(result.ends_with("is due."));
    }
}
