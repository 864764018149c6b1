//! Versioned model artifacts.
//!
//! A fitted classifier is written as one JSON document holding the format
//! version, the hyperparameters, the class list and the fitted pipeline.
//! Paths ending in `.gz` are gzip-compressed; `read` detects compression
//! from the file's magic bytes, not its name.

use crate::config::{ModelConfig, PreprocessorConfig};
use crate::error::{Error, Result};
use crate::ml::ClausePipeline;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Artifact layout version written by this crate.
pub const FORMAT_VERSION: u32 = 1;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Hyperparameters stored next to the fitted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Model hyperparameters
    pub model: ModelConfig,
    /// Preprocessing toggles used at training time
    pub preprocessor: PreprocessorConfig,
}

/// Serialized form of a fitted classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Layout version
    pub format_version: u32,
    /// Version of the crate that wrote the artifact
    pub crate_version: String,
    /// Hyperparameters
    pub config: ArtifactConfig,
    /// Sorted class labels
    pub classes: Vec<String>,
    /// Fitted feature and classifier stages
    pub pipeline: ClausePipeline,
}

impl ModelArtifact {
    /// Assemble an artifact for the current format version.
    pub fn new(config: ArtifactConfig, pipeline: ClausePipeline) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            classes: pipeline.classes().to_vec(),
            pipeline,
        }
    }

    /// Write to `path`, gzip-compressed when the path ends in `.gz`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = BufWriter::new(File::create(path)?);
        let compressed = path.extension().is_some_and(|ext| ext == "gz");

        if compressed {
            let mut encoder = GzEncoder::new(file, Compression::default());
            serde_json::to_writer(&mut encoder, self)?;
            encoder.finish()?.flush()?;
        } else {
            let mut file = file;
            serde_json::to_writer(&mut file, self)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Read and validate an artifact.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the file does not exist
    /// - [`Error::CorruptArtifact`] if the content is not a valid artifact
    /// - [`Error::IncompatibleArtifact`] for another format version or
    ///   internally inconsistent state
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let raw = std::fs::read(path)?;
        let bytes = if raw.starts_with(&GZIP_MAGIC) {
            let mut decoded = Vec::new();
            GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
            decoded
        } else {
            raw
        };

        let corrupt = |source| Error::CorruptArtifact {
            path: path.to_path_buf(),
            source,
        };
        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(corrupt)?;

        // Check the version before the layout so old artifacts get a clear error
        let version = value.get("format_version").and_then(serde_json::Value::as_u64);
        if version != Some(u64::from(FORMAT_VERSION)) {
            return Err(Error::IncompatibleArtifact {
                path: path.to_path_buf(),
                reason: format!(
                    "format version {:?}, expected {}",
                    version, FORMAT_VERSION
                ),
            });
        }

        let artifact: ModelArtifact = serde_json::from_value(value).map_err(corrupt)?;
        artifact.validate(path)?;
        Ok(artifact)
    }

    /// Reject artifacts whose stored indices do not fit the stored vectors,
    /// weights and classes.
    fn validate(&self, path: &Path) -> Result<()> {
        let incompatible = |reason: String| Error::IncompatibleArtifact {
            path: path.to_path_buf(),
            reason,
        };

        let model = match self.pipeline.classifier_stage.model() {
            Some(model) if self.pipeline.is_fitted() => model,
            _ => return Err(incompatible("pipeline is not fitted".into())),
        };
        if self.classes != self.pipeline.classes() {
            return Err(incompatible("class list does not match the fitted classifier".into()));
        }

        let vectorizer = &self.pipeline.feature_stage;
        let n_features = vectorizer.idf().len();
        if n_features != vectorizer.vocabulary().len() {
            return Err(incompatible("idf weights do not match the vocabulary".into()));
        }
        let out_of_range = vectorizer.vocabulary().iter().find(|&(_, &c)| c >= n_features);
        if let Some((term, column)) = out_of_range {
            return Err(incompatible(format!(
                "term '{}' maps to column {} of {}",
                term, column, n_features
            )));
        }

        let k = model.classes.len();
        if k < 2 {
            return Err(incompatible(format!("{} classes stored, need at least 2", k)));
        }
        if model.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(incompatible("classes are not sorted and distinct".into()));
        }
        let expected = k * (k - 1) / 2;
        if model.machines.len() != expected {
            return Err(incompatible(format!(
                "{} pairwise machines for {} classes, expected {}",
                model.machines.len(),
                k,
                expected
            )));
        }

        for (i, sv) in model.support_vectors.iter().enumerate() {
            if sv.indices.len() != sv.values.len() {
                return Err(incompatible(format!(
                    "support vector {} has {} indices and {} values",
                    i,
                    sv.indices.len(),
                    sv.values.len()
                )));
            }
        }

        let n_support = model.support_vectors.len();
        for (m, machine) in model.machines.iter().enumerate() {
            let (positive, negative) = (machine.positive, machine.negative);
            if positive >= k || negative >= k || positive == negative {
                return Err(incompatible(format!(
                    "machine {} pairs classes {} and {} of {}",
                    m, positive, negative, k
                )));
            }
            if machine.coef.len() != machine.support.len() {
                return Err(incompatible(format!(
                    "machine {} has {} coefficients for {} support vectors",
                    m,
                    machine.coef.len(),
                    machine.support.len()
                )));
            }
            if let Some(&s) = machine.support.iter().find(|&&s| s >= n_support) {
                return Err(incompatible(format!(
                    "machine {} refers to support vector {} of {}",
                    m, s, n_support
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fitted_artifact() -> ModelArtifact {
        let texts: Vec<String> = [
            "monthly rent payment due",
            "rent paid monthly by check",
            "late rent payment fee",
            "no pets allowed",
            "dogs cats pets prohibited",
            "animals pets approval",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let labels: Vec<String> = ["rent", "rent", "rent", "pets", "pets", "pets"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let model = ModelConfig::default();
        let mut pipeline = ClausePipeline::from_config(&model);
        pipeline.fit(&texts, &labels).unwrap();
        ModelArtifact::new(
            ArtifactConfig {
                model,
                preprocessor: PreprocessorConfig::default(),
            },
            pipeline,
        )
    }

    #[test]
    fn test_round_trip_plain_and_gzip() {
        let dir = tempdir().unwrap();
        let artifact = fitted_artifact();

        for name in ["model.json", "model.json.gz"] {
            let path = dir.path().join(name);
            artifact.write(&path).unwrap();
            let loaded = ModelArtifact::read(&path).unwrap();
            assert_eq!(loaded.classes, artifact.classes);
            assert_eq!(
                loaded.pipeline.predict_proba("monthly rent").unwrap(),
                artifact.pipeline.predict_proba("monthly rent").unwrap()
            );
        }

        let raw = std::fs::read(dir.path().join("model.json.gz")).unwrap();
        assert_eq!(&raw[..2], &GZIP_MAGIC);
    }

    #[test]
    fn test_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(ModelArtifact::read(&path), Err(Error::CorruptArtifact { .. })));
    }

    #[test]
    fn test_incompatible_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.json");
        std::fs::write(&path, br#"{"format_version": 99}"#).unwrap();
        assert!(matches!(
            ModelArtifact::read(&path),
            Err(Error::IncompatibleArtifact { .. })
        ));
    }

    #[test]
    fn test_missing() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            ModelArtifact::read(dir.path().join("absent.json")),
            Err(Error::NotFound(_))
        ));
    }
}
