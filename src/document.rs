//! Whole-document classification.
//!
//! Segments a document's text, classifies every clause in parallel and
//! groups the results by predicted clause type. A clause that fails to
//! classify is logged and reported as skipped; the rest of the document is
//! still processed.

use crate::classifier::LeaseClauseClassifier;
use crate::data::LabelMapping;
use crate::error::{Error, Result};
use crate::segment::ClauseSegmenter;
use indexmap::IndexMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

/// One classified clause inside a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedClause {
    /// Position of the clause in the document
    pub clause_index: usize,
    /// Clause text
    pub text: String,
    /// Probability of the group's type, rounded to four decimals
    pub confidence: f64,
}

/// Clauses sharing a predicted type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseGroup {
    /// Predicted clause type
    #[serde(rename = "type")]
    pub clause_type: String,
    /// Id of the type in the label mapping, if known
    pub type_id: Option<String>,
    /// Clauses in document order
    pub values: Vec<ClassifiedClause>,
}

/// A clause that could not be classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedClause {
    /// Position of the clause in the document
    pub clause_index: usize,
    /// Why classification failed
    pub error: String,
}

/// Classification of a whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DocumentClassification {
    /// Number of classified clauses
    pub total_clauses: usize,
    /// Number of distinct predicted types
    pub total_clause_types: usize,
    /// Groups in order of first appearance
    pub clauses: Vec<ClauseGroup>,
    /// Clauses that failed to classify
    pub skipped: Vec<SkippedClause>,
}

/// Split document text into clauses.
///
/// Falls back to a plain split on `.` (keeping pieces longer than
/// `min_length` characters) when the segmenter finds nothing.
pub fn document_clauses(text: &str, min_length: usize) -> Vec<String> {
    let clauses = ClauseSegmenter::new(min_length).split_into_clauses(text);
    if !clauses.is_empty() {
        return clauses;
    }

    text.split('.')
        .map(str::trim)
        .filter(|piece| piece.chars().count() > min_length)
        .map(str::to_string)
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Classify every clause of a document and group the results by type.
///
/// # Arguments
///
/// * `classifier` - Fitted classifier, shared read-only across worker threads
/// * `text` - Raw document text
/// * `min_length` - Minimum clause length in characters
/// * `mapping` - Optional mapping used to attach type ids to groups
///
/// # Errors
///
/// Returns [`Error::NotFitted`] if the classifier is not fitted. Failures
/// of individual clauses are reported in
/// [`DocumentClassification::skipped`].
pub fn classify_document(
    classifier: &LeaseClauseClassifier,
    text: &str,
    min_length: usize,
    mapping: Option<&LabelMapping>,
) -> Result<DocumentClassification> {
    if !classifier.is_fitted() {
        return Err(Error::NotFitted("Classifier must be fitted before prediction."));
    }

    let clauses = document_clauses(text, min_length);
    if clauses.is_empty() {
        warn!("No clauses could be extracted from the document");
        return Ok(DocumentClassification::default());
    }
    info!("Classifying {} clauses", clauses.len());

    let outcomes: Vec<_> = clauses
        .par_iter()
        .enumerate()
        .map(|(index, clause)| (index, classifier.classify_one(clause)))
        .collect();

    let mut groups: IndexMap<String, ClauseGroup> = IndexMap::new();
    let mut skipped = Vec::new();
    for ((index, outcome), clause) in outcomes.into_iter().zip(clauses) {
        match outcome {
            Ok(prediction) => {
                debug!(
                    "Clause {} classified as {} ({:.4})",
                    index, prediction.label, prediction.confidence
                );
                let group = groups
                    .entry(prediction.label.clone())
                    .or_insert_with(|| ClauseGroup {
                        type_id: mapping
                            .and_then(|m| m.get_id(&prediction.label))
                            .map(str::to_string),
                        clause_type: prediction.label.clone(),
                        values: Vec::new(),
                    });
                group.values.push(ClassifiedClause {
                    clause_index: index,
                    text: clause,
                    confidence: round4(prediction.confidence),
                });
            },
            Err(e) => {
                warn!("Clause {} classification error: {}", index, e);
                skipped.push(SkippedClause {
                    clause_index: index,
                    error: e.to_string(),
                });
            },
        }
    }

    let clauses: Vec<ClauseGroup> = groups.into_values().collect();
    let total_clauses = clauses.iter().map(|g| g.values.len()).sum();
    info!(
        "Document classified: {} clauses in {} types, {} skipped",
        total_clauses,
        clauses.len(),
        skipped.len()
    );

    Ok(DocumentClassification {
        total_clauses,
        total_clause_types: clauses.len(),
        clauses,
        skipped,
    })
}
