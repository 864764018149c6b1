//! Tests for text normalization and clause preprocessing.

use lease_clause::config::PreprocessorConfig;
use lease_clause::text::normalizer::{ends_with_terminal, is_hard_break_starter};
use lease_clause::{TextNormalizer, TextPreprocessor};
use proptest::prelude::*;

fn normalize(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

mod normalizer {
    use super::*;

    #[test]
    fn test_pdf_page_text() {
        let page = "LEASE AGREEMENT\n\n1. The Tenant agrees to pay\nrent of $1,200 per\nmonth.\n\n2. The security de-\nposit is $1,200.\n";
        assert_eq!(
            normalize(page),
            "LEASE AGREEMENT\n\n1. The Tenant agrees to pay rent of $1,200 per month.\n\n2. The security deposit is $1,200."
        );
    }

    #[test]
    fn test_hyphenated_wrap_removed() {
        let result = normalize("The tenant is respon-\nsible for repairs.");
        assert_eq!(result, "The tenant is responsible for repairs.");
        assert!(!result.contains('-'));
        assert!(!result.contains('\n'));
    }

    #[test]
    fn test_list_dash_is_not_a_word_split() {
        assert_eq!(normalize("Duties:\n- mow the lawn."), "Duties:\n- mow the lawn.");
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(normalize("  \n\t\n  "), "");
    }

    #[test]
    fn test_helpers() {
        assert!(is_hard_break_starter('A'));
        assert!(is_hard_break_starter('7'));
        assert!(is_hard_break_starter('('));
        assert!(!is_hard_break_starter('a'));
        assert!(ends_with_terminal("Rent is due. "));
        assert!(ends_with_terminal("Notes:"));
        assert!(!ends_with_terminal("Section One"));
    }
}

mod preprocessor {
    use super::*;

    #[test]
    fn test_default_pipeline() {
        let p = TextPreprocessor::default();
        assert_eq!(
            p.clean_text("The Rent of $1,500.00 is DUE on the 1st!"),
            "the rent of 150000 is due on the 1st"
        );
    }

    #[test]
    fn test_remove_numbers() {
        let p = TextPreprocessor::new(PreprocessorConfig::default().with_remove_numbers(true));
        assert_eq!(p.clean_text("Pay 30 days after the 1st notice"), "pay days after the st notice");
    }

    #[test]
    fn test_batch_is_elementwise() {
        let p = TextPreprocessor::default();
        let texts = ["A. B.", "  ", "Pets: NO"];
        assert_eq!(p.preprocess_batch(&texts), vec!["a b", "", "pets no"]);
    }

    #[test]
    fn test_clean_value() {
        let p = TextPreprocessor::default();
        assert_eq!(p.clean_value(3.5), "35");
    }
}

proptest! {
    /// Normalizing normalized text is a no-op.
    #[test]
    fn normalize_is_idempotent(text in "[a-zA-Z0-9 .,;:()\\-\n]{0,120}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Preprocessing preprocessed text is a no-op for the default toggles.
    #[test]
    fn preprocess_is_idempotent(text in "[ -~\n\t]{0,120}") {
        let p = TextPreprocessor::default();
        let once = p.clean_text(&text);
        prop_assert_eq!(p.clean_text(&once), once);
    }
}
