//! Classification metrics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Precision, recall and F1 for one label.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Correct predictions of the label over all predictions of it
    pub precision: f64,
    /// Correct predictions of the label over all true occurrences
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
    /// Number of true occurrences
    pub support: usize,
}

/// Fraction of predictions equal to the truth. Empty input scores 0.
pub fn accuracy<T: AsRef<str>, P: AsRef<str>>(y_true: &[T], y_pred: &[P]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t.as_ref() == p.as_ref())
        .count();
    correct as f64 / y_true.len() as f64
}

/// Label order for reports: `classes` first, then any other label seen in
/// `y_true` or `y_pred`, sorted.
pub fn report_labels<T: AsRef<str>, P: AsRef<str>>(
    classes: &[String],
    y_true: &[T],
    y_pred: &[P],
) -> Vec<String> {
    let mut labels = classes.to_vec();
    let mut extra: Vec<String> = y_true
        .iter()
        .map(|t| t.as_ref())
        .chain(y_pred.iter().map(|p| p.as_ref()))
        .filter(|l| !classes.iter().any(|c| c == l))
        .map(str::to_string)
        .collect();
    extra.sort();
    extra.dedup();
    labels.extend(extra);
    labels
}

/// Confusion matrix with rows as true labels and columns as predictions.
///
/// Pairs whose labels are not in `labels` are ignored.
pub fn confusion_matrix<T: AsRef<str>, P: AsRef<str>>(
    y_true: &[T],
    y_pred: &[P],
    labels: &[String],
) -> Vec<Vec<usize>> {
    let position: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let mut matrix = vec![vec![0; labels.len()]; labels.len()];
    for (t, p) in y_true.iter().zip(y_pred) {
        if let (Some(&row), Some(&col)) = (position.get(t.as_ref()), position.get(p.as_ref())) {
            matrix[row][col] += 1;
        }
    }
    matrix
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Per-label metrics from a confusion matrix. Zero divisions yield 0.
pub fn per_class_metrics(labels: &[String], matrix: &[Vec<usize>]) -> IndexMap<String, ClassMetrics> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let tp = matrix[i][i];
            let support: usize = matrix[i].iter().sum();
            let predicted: usize = matrix.iter().map(|row| row[i]).sum();
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            (
                label.clone(),
                ClassMetrics {
                    precision,
                    recall,
                    f1,
                    support,
                },
            )
        })
        .collect()
}

/// Unweighted mean over labels.
pub fn macro_average(per_class: &IndexMap<String, ClassMetrics>) -> ClassMetrics {
    let n = per_class.len().max(1) as f64;
    let mut avg = per_class.values().fold(ClassMetrics::default(), |mut acc, m| {
        acc.precision += m.precision;
        acc.recall += m.recall;
        acc.f1 += m.f1;
        acc.support += m.support;
        acc
    });
    avg.precision /= n;
    avg.recall /= n;
    avg.f1 /= n;
    avg
}

/// Mean over labels weighted by support.
pub fn weighted_average(per_class: &IndexMap<String, ClassMetrics>) -> ClassMetrics {
    let total: usize = per_class.values().map(|m| m.support).sum();
    let mut avg = ClassMetrics {
        support: total,
        ..ClassMetrics::default()
    };
    if total == 0 {
        return avg;
    }
    for m in per_class.values() {
        let w = m.support as f64 / total as f64;
        avg.precision += w * m.precision;
        avg.recall += w * m.recall;
        avg.f1 += w * m.f1;
    }
    avg
}

/// Render the usual plain-text classification report.
pub fn classification_report(
    per_class: &IndexMap<String, ClassMetrics>,
    accuracy: f64,
    macro_avg: &ClassMetrics,
    weighted_avg: &ClassMetrics,
) -> String {
    const WEIGHTED: &str = "weighted avg";
    let width = per_class
        .keys()
        .map(|l| l.chars().count())
        .chain(std::iter::once(WEIGHTED.len()))
        .max()
        .unwrap_or(WEIGHTED.len());

    let row = |name: &str, m: &ClassMetrics| {
        format!(
            "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            name,
            m.precision,
            m.recall,
            m.f1,
            m.support,
            width = width
        )
    };

    let mut out = format!(
        "{:>width$}  {:>9} {:>9} {:>9} {:>9}\n\n",
        "",
        "precision",
        "recall",
        "f1-score",
        "support",
        width = width
    );
    for (label, m) in per_class {
        out.push_str(&row(label, m));
    }
    out.push('\n');
    out.push_str(&format!(
        "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}\n",
        "accuracy",
        "",
        "",
        accuracy,
        weighted_avg.support,
        width = width
    ));
    out.push_str(&row("macro avg", macro_avg));
    out.push_str(&row(WEIGHTED, weighted_avg));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&["a", "b", "a", "b"], &["a", "b", "b", "b"]), 0.75);
        assert_eq!(accuracy::<&str, &str>(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_matrix() {
        let classes = labels(&["a", "b"]);
        let m = confusion_matrix(&["a", "a", "b"], &["a", "b", "b"], &classes);
        assert_eq!(m, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn test_report_labels_appends_unknown() {
        let classes = labels(&["b", "c"]);
        let all = report_labels(&classes, &["z", "b"], &["a", "c"]);
        assert_eq!(all, labels(&["b", "c", "a", "z"]));
    }

    #[test]
    fn test_per_class_and_averages() {
        let classes = labels(&["a", "b"]);
        let m = confusion_matrix(&["a", "a", "b", "b"], &["a", "b", "b", "b"], &classes);
        let per_class = per_class_metrics(&classes, &m);

        let a = per_class["a"];
        assert_eq!(a.precision, 1.0);
        assert_eq!(a.recall, 0.5);
        assert!((a.f1 - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(a.support, 2);

        let macro_avg = macro_average(&per_class);
        let weighted = weighted_average(&per_class);
        assert_eq!(macro_avg.support, 4);
        assert!((macro_avg.recall - 0.75).abs() < 1e-12);
        assert!((weighted.recall - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_zero_division() {
        let classes = labels(&["a", "b"]);
        let m = confusion_matrix(&["a"], &["a"], &classes);
        let per_class = per_class_metrics(&classes, &m);
        assert_eq!(per_class["b"], ClassMetrics::default());
    }

    #[test]
    fn test_report_layout() {
        let classes = labels(&["pets", "rent_payment"]);
        let m = confusion_matrix(&["pets", "rent_payment"], &["pets", "rent_payment"], &classes);
        let per_class = per_class_metrics(&classes, &m);
        let report = classification_report(
            &per_class,
            1.0,
            &macro_average(&per_class),
            &weighted_average(&per_class),
        );
        assert!(report.contains("precision"));
        assert!(report.contains("rent_payment"));
        assert!(report.contains("weighted avg"));
        assert!(report.lines().any(|l| l.trim_start().starts_with("accuracy")));
    }
}
