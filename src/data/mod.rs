//! Training data: loading, saving, label mapping and the sample corpus.

pub mod loader;
pub mod mapping;
pub mod sample;

pub use loader::{DataLoader, DatasetStats};
pub use mapping::LabelMapping;

use serde::{Deserialize, Serialize};

/// One labeled clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Clause text
    pub text: String,
    /// Clause type
    pub label: String,
}

/// Parallel texts and labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Clause texts
    pub texts: Vec<String>,
    /// Clause types, parallel to `texts`
    pub labels: Vec<String>,
}

impl Dataset {
    /// Empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Append one sample.
    pub fn push(&mut self, text: impl Into<String>, label: impl Into<String>) {
        self.texts.push(text.into());
        self.labels.push(label.into());
    }

    /// Append all samples of another dataset.
    pub fn append(&mut self, other: Dataset) {
        self.texts.extend(other.texts);
        self.labels.extend(other.labels);
    }

    /// Iterate over `(text, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.texts
            .iter()
            .map(String::as_str)
            .zip(self.labels.iter().map(String::as_str))
    }

    /// Samples restricted to `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        indices
            .iter()
            .map(|&i| (self.texts[i].clone(), self.labels[i].clone()))
            .collect()
    }

    /// Owned samples.
    pub fn samples(&self) -> Vec<TrainingSample> {
        self.iter()
            .map(|(text, label)| TrainingSample {
                text: text.to_string(),
                label: label.to_string(),
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let (texts, labels) = iter.into_iter().unzip();
        Self { texts, labels }
    }
}

impl FromIterator<TrainingSample> for Dataset {
    fn from_iter<I: IntoIterator<Item = TrainingSample>>(iter: I) -> Self {
        iter.into_iter().map(|s| (s.text, s.label)).collect()
    }
}
