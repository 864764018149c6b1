//! Tests for whole-document classification.

use lease_clause::data::sample::sample_data;
use lease_clause::document::{classify_document, document_clauses};
use lease_clause::{Error, LabelMapping, LeaseClauseClassifier};
use std::sync::OnceLock;

fn classifier() -> &'static LeaseClauseClassifier {
    static CLASSIFIER: OnceLock<LeaseClauseClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(|| {
        let data = sample_data();
        let mut classifier = LeaseClauseClassifier::default();
        classifier.fit(&data.texts, &data.labels).expect("sample corpus trains");
        classifier
    })
}

const LEASE: &str = "RESIDENTIAL LEASE\n\n\
1. The monthly rent shall be $1,500, due on the first day of each\n\
month.\n\n\
2. A security deposit of $3,000 is required prior to move-in.\n\n\
3. No pets are allowed on the premises without written consent.\n\n\
4. Tenant shall keep the premises clean and report needed re-\n\
pairs promptly.";

mod grouping {
    use super::*;

    #[test]
    fn test_every_clause_is_accounted_for() {
        let clauses = document_clauses(LEASE, 20);
        let result = classify_document(classifier(), LEASE, 20, None).unwrap();

        assert_eq!(result.total_clauses + result.skipped.len(), clauses.len());
        assert_eq!(result.total_clause_types, result.clauses.len());
        let grouped: usize = result.clauses.iter().map(|g| g.values.len()).sum();
        assert_eq!(grouped, result.total_clauses);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let result = classify_document(classifier(), LEASE, 20, None).unwrap();

        let first_indices: Vec<usize> = result
            .clauses
            .iter()
            .map(|g| g.values[0].clause_index)
            .collect();
        let mut sorted = first_indices.clone();
        sorted.sort_unstable();
        assert_eq!(first_indices, sorted);

        for group in &result.clauses {
            let indices: Vec<usize> = group.values.iter().map(|v| v.clause_index).collect();
            assert!(indices.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_values_match_single_clause_predictions() {
        let clauses = document_clauses(LEASE, 20);
        let result = classify_document(classifier(), LEASE, 20, None).unwrap();

        for group in &result.clauses {
            for value in &group.values {
                assert_eq!(value.text, clauses[value.clause_index]);
                let prediction = classifier().classify_one(&value.text).unwrap();
                assert_eq!(prediction.label, group.clause_type);
                assert!((value.confidence - prediction.confidence).abs() <= 5e-5);
                assert_eq!(value.confidence, (value.confidence * 1e4).round() / 1e4);
            }
        }
    }

    #[test]
    fn test_wrapped_lines_are_joined() {
        let clauses = document_clauses(LEASE, 20);
        assert!(clauses.iter().any(|c| c.contains("report needed repairs promptly")));
        assert!(clauses.iter().all(|c| !c.contains('\n')));
    }
}

mod type_ids {
    use super::*;

    #[test]
    fn test_mapping_attaches_ids() {
        let mut mapping = LabelMapping::default();
        for (i, label) in classifier().classes().iter().enumerate() {
            mapping.insert(format!("id{}", i), label.clone());
        }

        let result = classify_document(classifier(), LEASE, 20, Some(&mapping)).unwrap();
        for group in &result.clauses {
            let expected = mapping.get_id(&group.clause_type).map(str::to_string);
            assert!(expected.is_some());
            assert_eq!(group.type_id, expected);
        }

        let unmapped = classify_document(classifier(), LEASE, 20, None).unwrap();
        assert!(unmapped.clauses.iter().all(|g| g.type_id.is_none()));
    }

    #[test]
    fn test_json_shape() {
        let result = classify_document(classifier(), LEASE, 20, None).unwrap();
        let value = serde_json::to_value(&result).unwrap();

        let group = &value["clauses"][0];
        assert!(group["type"].is_string());
        assert!(group["type_id"].is_null());
        assert!(group["values"][0]["clause_index"].is_u64());
        assert!(group["values"][0]["confidence"].is_f64());
        assert_eq!(value["total_clauses"], result.total_clauses);
    }
}

mod edge_cases {
    use super::*;

    #[test]
    fn test_empty_document() {
        let result = classify_document(classifier(), "", 20, None).unwrap();
        assert_eq!(result.total_clauses, 0);
        assert!(result.clauses.is_empty());
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_punctuation_only_clause_is_skipped() {
        let text = "The monthly rent is due on the first day.\n\n... ... ... ... ... ... ... ...";
        let result = classify_document(classifier(), text, 20, None).unwrap();

        assert_eq!(result.total_clauses, 1);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].clause_index, 1);
        assert!(result.skipped[0].error.contains("empty"));
    }

    #[test]
    fn test_unfitted_classifier() {
        let unfitted = LeaseClauseClassifier::default();
        assert!(matches!(
            classify_document(&unfitted, LEASE, 20, None),
            Err(Error::NotFitted(_))
        ));
    }
}
