//! Tests for saving, loading and the load-or-train lifecycle.

use lease_clause::artifact::{ModelArtifact, FORMAT_VERSION};
use lease_clause::config::PreprocessorConfig;
use lease_clause::data::sample::sample_data;
use lease_clause::data::DataLoader;
use lease_clause::{Error, LeaseClauseClassifier, LeaseConfig, ModelConfig, ModelPaths};
use tempfile::tempdir;

const PROBES: &[&str] = &[
    "The monthly rent is due on the first day of each month.",
    "No dogs or cats may be kept in the unit.",
    "Tenant must carry renters insurance.",
];

fn fitted(preprocessor: PreprocessorConfig) -> LeaseClauseClassifier {
    let data = sample_data();
    let mut classifier = LeaseClauseClassifier::with_preprocessor(ModelConfig::default(), preprocessor);
    classifier.fit(&data.texts, &data.labels).unwrap();
    classifier
}

fn assert_same_predictions(a: &LeaseClauseClassifier, b: &LeaseClauseClassifier) {
    assert_eq!(a.classes(), b.classes());
    for probe in PROBES {
        assert_eq!(a.predict_one(probe).unwrap(), b.predict_one(probe).unwrap());
        let pa = a.predict_proba_one(probe).unwrap();
        let pb = b.predict_proba_one(probe).unwrap();
        for (label, p) in &pa {
            assert!((p - pb[label]).abs() < 1e-12, "{} differs for {:?}", label, probe);
        }
    }
}

mod round_trip {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lease_model.json");
        let classifier = fitted(PreprocessorConfig::default());

        classifier.save(&path).unwrap();
        let loaded = LeaseClauseClassifier::load(&path).unwrap();

        assert!(loaded.is_fitted());
        assert_same_predictions(&classifier, &loaded);
    }

    #[test]
    fn test_gzip_round_trip() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("model.json");
        let compressed = dir.path().join("model.json.gz");
        let classifier = fitted(PreprocessorConfig::default());

        classifier.save(&plain).unwrap();
        classifier.save(&compressed).unwrap();

        let plain_size = std::fs::metadata(&plain).unwrap().len();
        let compressed_size = std::fs::metadata(&compressed).unwrap().len();
        assert!(compressed_size < plain_size);

        let loaded = LeaseClauseClassifier::load(&compressed).unwrap();
        assert_same_predictions(&classifier, &loaded);
    }

    #[test]
    fn test_preprocessor_config_is_stored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let preprocessor = PreprocessorConfig::default().with_remove_numbers(true);
        fitted(preprocessor).save(&path).unwrap();

        let loaded = LeaseClauseClassifier::load(&path).unwrap();
        assert_eq!(loaded.preprocessor().config(), &preprocessor);
    }

    #[test]
    fn test_artifact_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fitted(PreprocessorConfig::default()).save(&path).unwrap();

        let artifact = ModelArtifact::read(&path).unwrap();
        assert_eq!(artifact.format_version, FORMAT_VERSION);
        assert_eq!(artifact.crate_version, lease_clause::VERSION);
        assert_eq!(artifact.classes.len(), 10);
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_save_unfitted() {
        let dir = tempdir().unwrap();
        let err = LeaseClauseClassifier::default()
            .save(dir.path().join("model.json"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot save an unfitted classifier.");
    }

    #[test]
    fn test_load_missing() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            LeaseClauseClassifier::load(dir.path().join("absent.json")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_load_truncated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fitted(PreprocessorConfig::default()).save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(
            LeaseClauseClassifier::load(&path),
            Err(Error::CorruptArtifact { .. })
        ));
    }

    #[test]
    fn test_load_other_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fitted(PreprocessorConfig::default()).save(&path).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        value["format_version"] = serde_json::json!(FORMAT_VERSION + 1);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(matches!(
            LeaseClauseClassifier::load(&path),
            Err(Error::IncompatibleArtifact { .. })
        ));
    }

    #[test]
    fn test_load_mismatched_classes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fitted(PreprocessorConfig::default()).save(&path).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        value["classes"] = serde_json::json!(["only_one"]);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(matches!(
            LeaseClauseClassifier::load(&path),
            Err(Error::IncompatibleArtifact { .. })
        ));
    }
}

mod inconsistent_artifacts {
    use super::*;
    use serde_json::{json, Value};

    /// Save a fitted model, apply `edit` to its JSON and try to load it back.
    fn load_edited(edit: impl FnOnce(&mut Value)) -> lease_clause::Result<LeaseClauseClassifier> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fitted(PreprocessorConfig::default()).save(&path).unwrap();

        let mut value: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        edit(&mut value);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        LeaseClauseClassifier::load(&path)
    }

    fn assert_incompatible(result: lease_clause::Result<LeaseClauseClassifier>, needle: &str) {
        match result {
            Err(Error::IncompatibleArtifact { reason, .. }) => {
                assert!(reason.contains(needle), "unexpected reason: {}", reason)
            },
            Err(other) => panic!("expected IncompatibleArtifact, got {:?}", other),
            Ok(_) => panic!("inconsistent artifact loaded"),
        }
    }

    fn model(value: &mut Value) -> &mut Value {
        &mut value["pipeline"]["classifier_stage"]["model"]
    }

    #[test]
    fn test_support_index_out_of_range() {
        let result = load_edited(|value| {
            let machine = &mut model(value)["machines"][0];
            machine["support"].as_array_mut().unwrap().push(json!(999_999));
            machine["coef"].as_array_mut().unwrap().push(json!(0.5));
        });
        assert_incompatible(result, "support vector 999999");
    }

    #[test]
    fn test_vocabulary_column_out_of_range() {
        let result = load_edited(|value| {
            let vocabulary = value["pipeline"]["feature_stage"]["vocabulary"]
                .as_object_mut()
                .unwrap();
            let term = vocabulary.keys().next().unwrap().clone();
            vocabulary.insert(term, json!(10_000_000));
        });
        assert_incompatible(result, "column 10000000");
    }

    #[test]
    fn test_class_index_out_of_range() {
        let result = load_edited(|value| model(value)["machines"][0]["positive"] = json!(99));
        assert_incompatible(result, "pairs classes 99");
    }

    #[test]
    fn test_coefficients_do_not_match_support() {
        let result = load_edited(|value| {
            model(value)["machines"][0]["coef"].as_array_mut().unwrap().push(json!(1.0));
        });
        assert_incompatible(result, "coefficients");
    }

    #[test]
    fn test_missing_pairwise_machine() {
        let result = load_edited(|value| {
            model(value)["machines"].as_array_mut().unwrap().pop();
        });
        assert_incompatible(result, "expected 45");
    }

    #[test]
    fn test_untouched_artifact_still_loads() {
        let loaded = load_edited(|_| {}).unwrap();
        assert!(loaded.predict_one(PROBES[0]).is_ok());
    }
}

mod load_or_train {
    use super::*;

    #[test]
    fn test_trains_then_loads() {
        let dir = tempdir().unwrap();
        let train_data = dir.path().join("train.json");
        DataLoader::save_json(&sample_data(), &train_data).unwrap();

        let paths = ModelPaths {
            model: dir.path().join("model.json"),
            train_data,
            mapping: dir.path().join("absent_mapping.json"),
        };
        let config = LeaseConfig::default();

        let trained = LeaseClauseClassifier::load_or_train(&paths, &config).unwrap();
        assert!(paths.model.exists());

        // Second call loads the saved model even without training data
        std::fs::remove_file(&paths.train_data).unwrap();
        let loaded = LeaseClauseClassifier::load_or_train(&paths, &config).unwrap();
        assert_same_predictions(&trained, &loaded);
    }

    #[test]
    fn test_applies_label_mapping() {
        let dir = tempdir().unwrap();
        let train_data = dir.path().join("train.csv");
        std::fs::write(
            &train_data,
            "text,label\n\
             The monthly rent is due on the first,r1\n\
             Rent is paid by check each month,r1\n\
             Late rent incurs a fee,r1\n\
             No pets are allowed in the unit,p2\n\
             Dogs and cats need approval,p2\n\
             A pet deposit is required,p2\n",
        )
        .unwrap();
        let mapping = dir.path().join("mapping.json");
        std::fs::write(
            &mapping,
            r#"[{"_id": {"$oid": "r1"}, "name": "rent_payment"}, {"_id": "p2", "name": "pets"}]"#,
        )
        .unwrap();

        let paths = ModelPaths {
            model: dir.path().join("model.json.gz"),
            train_data,
            mapping,
        };
        let classifier = LeaseClauseClassifier::load_or_train(&paths, &LeaseConfig::default()).unwrap();
        assert_eq!(classifier.classes(), &["pets", "rent_payment"]);
    }

    #[test]
    fn test_missing_training_data() {
        let dir = tempdir().unwrap();
        let paths = ModelPaths {
            model: dir.path().join("model.json"),
            train_data: dir.path().join("absent"),
            mapping: dir.path().join("absent.json"),
        };
        assert!(matches!(
            LeaseClauseClassifier::load_or_train(&paths, &LeaseConfig::default()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_training_data() {
        let dir = tempdir().unwrap();
        let train_data = dir.path().join("empty.json");
        std::fs::write(&train_data, r#"{"training_data": []}"#).unwrap();
        let paths = ModelPaths {
            model: dir.path().join("model.json"),
            train_data,
            mapping: dir.path().join("absent.json"),
        };
        assert!(matches!(
            LeaseClauseClassifier::load_or_train(&paths, &LeaseConfig::default()),
            Err(Error::Training(_))
        ));
        assert!(!paths.model.exists());
    }
}
