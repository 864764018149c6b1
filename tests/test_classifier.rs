//! Tests for the classifier facade.

use lease_clause::data::sample::{sample_data, CLAUSE_TYPES};
use lease_clause::data::Dataset;
use lease_clause::ml::KernelType;
use lease_clause::{Error, LeaseClauseClassifier, ModelConfig, Shaped};
use std::sync::OnceLock;

/// Classifier trained once on the sample corpus and shared by the tests.
fn sample_classifier() -> &'static LeaseClauseClassifier {
    static CLASSIFIER: OnceLock<LeaseClauseClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(|| {
        let data = sample_data();
        let mut classifier = LeaseClauseClassifier::default();
        classifier.fit(&data.texts, &data.labels).expect("sample corpus trains");
        classifier
    })
}

fn two_class_subset() -> Dataset {
    sample_data()
        .iter()
        .filter(|(_, label)| *label == "rent_payment" || *label == "pets")
        .map(|(text, label)| (text.to_string(), label.to_string()))
        .collect()
}

const PROBES: &[&str] = &[
    "The monthly rent is due on the first day of each month.",
    "No dogs or cats may be kept in the unit.",
    "Tenant must carry renters insurance.",
    "The security deposit will be returned within 30 days.",
    "Either party may end this agreement with 60 days notice.",
];

mod two_classes {
    use super::*;

    #[test]
    fn test_held_out_rent_clause() {
        let data = two_class_subset();
        assert_eq!(data.len(), 16);

        let mut classifier = LeaseClauseClassifier::default();
        classifier.fit(&data.texts, &data.labels).unwrap();

        let prediction = classifier
            .classify_one("The monthly rent due for the apartment is $1,700.")
            .unwrap();
        assert_eq!(prediction.label, "rent_payment");
        assert!(prediction.confidence > prediction.distribution["pets"]);
    }

    #[test]
    fn test_linear_kernel() {
        let data = two_class_subset();
        let mut classifier =
            LeaseClauseClassifier::new(ModelConfig::default().with_kernel(KernelType::Linear));
        classifier.fit(&data.texts, &data.labels).unwrap();
        assert_eq!(classifier.classes(), &["pets", "rent_payment"]);
        assert_eq!(
            classifier.predict_one("Rent payments are due monthly.").unwrap(),
            "rent_payment"
        );
    }
}

mod sample_corpus {
    use super::*;

    #[test]
    fn test_classes_sorted() {
        let mut expected: Vec<&str> = CLAUSE_TYPES.to_vec();
        expected.sort_unstable();
        assert_eq!(sample_classifier().classes(), expected.as_slice());
    }

    #[test]
    fn test_distribution_valid() {
        let classifier = sample_classifier();
        for probe in PROBES {
            let proba = classifier.predict_proba_one(probe).unwrap();
            assert_eq!(proba.len(), CLAUSE_TYPES.len());
            let total: f64 = proba.values().sum();
            assert!((total - 1.0).abs() < 1e-6, "sum {} for {:?}", total, probe);
            assert!(proba.values().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_predict_is_argmax_of_proba() {
        let classifier = sample_classifier();
        for probe in PROBES {
            let label = classifier.predict_one(probe).unwrap();
            let proba = classifier.predict_proba_one(probe).unwrap();
            let max = proba.values().copied().fold(f64::MIN, f64::max);
            let first_best = proba.iter().find(|(_, p)| **p == max).map(|(l, _)| l.clone());
            assert_eq!(Some(label), first_best);
        }
    }

    #[test]
    fn test_predictions_are_deterministic() {
        let classifier = sample_classifier();
        let first = classifier.predict_many(PROBES).unwrap();
        let second = classifier.predict_many(PROBES).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), PROBES.len());
    }
}

mod shapes {
    use super::*;

    #[test]
    fn test_single_text_gives_single_label() {
        let result = sample_classifier().predict("Rent is due monthly.").unwrap();
        assert!(matches!(result, Shaped::One(_)));
    }

    #[test]
    fn test_list_gives_list() {
        let result = sample_classifier().predict(vec!["a monthly rent", "no pets"]).unwrap();
        match result {
            Shaped::Many(labels) => assert_eq!(labels.len(), 2),
            Shaped::One(_) => panic!("expected a list"),
        }
    }

    #[test]
    fn test_proba_mirrors_shape() {
        let classifier = sample_classifier();
        assert!(classifier.predict_proba("Rent is due monthly.").unwrap().is_one());

        let many = classifier
            .predict_proba(&["rent", "pets", "deposit"][..])
            .unwrap()
            .into_vec();
        assert_eq!(many.len(), 3);
    }

    #[test]
    fn test_batch_fails_on_empty_clause() {
        let result = sample_classifier().predict(vec!["monthly rent", "..."]);
        assert!(matches!(result, Err(Error::EmptyClause)));
    }
}

mod unfitted {
    use super::*;

    #[test]
    fn test_predict_requires_fit() {
        let classifier = LeaseClauseClassifier::default();
        let err = classifier.predict("Rent is due.").unwrap_err();
        assert_eq!(err.to_string(), "Classifier must be fitted before prediction.");
        assert!(matches!(classifier.predict_proba_one("x"), Err(Error::NotFitted(_))));
    }

    #[test]
    fn test_single_class_rejected() {
        let mut classifier = LeaseClauseClassifier::default();
        let err = classifier
            .fit(&["rent is due", "rent is late"], &["rent", "rent"])
            .unwrap_err();
        assert!(matches!(err, Error::Training(_)));
        assert!(!classifier.is_fitted());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut classifier = LeaseClauseClassifier::new(ModelConfig::default().with_c(0.0));
        let data = two_class_subset();
        assert!(matches!(
            classifier.fit(&data.texts, &data.labels),
            Err(Error::InvalidConfig(_))
        ));
    }
}

mod evaluation {
    use super::*;

    #[test]
    fn test_evaluate_report() {
        let data = sample_data();
        let report = sample_classifier().evaluate(&data.texts, &data.labels).unwrap();

        assert!((0.0..=1.0).contains(&report.accuracy));
        assert_eq!(report.labels.len(), CLAUSE_TYPES.len());
        let total: usize = report.confusion_matrix.iter().flatten().sum();
        assert_eq!(total, data.len());
        let support: usize = report.per_class.values().map(|m| m.support).sum();
        assert_eq!(support, data.len());
        assert!(report.report.contains("accuracy"));
        assert!(report.report.contains("rent_payment"));
    }

    #[test]
    fn test_evaluate_unknown_label_gets_a_row() {
        let report = sample_classifier()
            .evaluate(&["Rent is due monthly."], &["mystery"])
            .unwrap();
        assert_eq!(report.accuracy, 0.0);
        assert!(report.labels.iter().any(|l| l == "mystery"));
        assert_eq!(report.per_class["mystery"].support, 1);
    }

    #[test]
    fn test_evaluate_length_mismatch() {
        assert!(matches!(
            sample_classifier().evaluate(&["a", "b"], &["x"]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_cross_validate() {
        let data = sample_data();
        let classifier = LeaseClauseClassifier::default();
        let cv = classifier.cross_validate(&data.texts, &data.labels, 2).unwrap();

        assert_eq!(cv.scores.len(), 2);
        assert!(cv.scores.iter().all(|s| (0.0..=1.0).contains(s)));
        assert!(cv.std >= 0.0);
        assert!(!classifier.is_fitted());
    }

    #[test]
    fn test_cross_validate_rejects_too_many_folds() {
        let data = two_class_subset();
        let classifier = LeaseClauseClassifier::default();
        assert!(classifier.cross_validate(&data.texts, &data.labels, 20).is_err());
    }
}
