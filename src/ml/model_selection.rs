//! Stratified data splits.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Training and validation indices of one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Indices used for training, ascending
    pub train: Vec<usize>,
    /// Indices held out, ascending
    pub test: Vec<usize>,
}

/// Sample indices per label, each list shuffled with `rng`.
fn shuffled_groups<L: AsRef<str>>(labels: &[L], rng: &mut StdRng) -> Vec<Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        groups.entry(label.as_ref()).or_default().push(i);
    }
    groups
        .into_values()
        .map(|mut members| {
            members.shuffle(rng);
            members
        })
        .collect()
}

/// Split indices into `n_folds` folds that keep label proportions.
///
/// Members of each label are shuffled with `seed` and dealt round-robin
/// across folds, continuing where the previous label stopped so fold sizes
/// stay balanced.
pub fn stratified_k_fold<L: AsRef<str>>(labels: &[L], n_folds: usize, seed: u64) -> Result<Vec<Fold>> {
    if n_folds < 2 {
        return Err(Error::Training(format!(
            "cross-validation needs at least 2 folds, got {}",
            n_folds
        )));
    }
    if n_folds > labels.len() {
        return Err(Error::Training(format!(
            "cannot split {} samples into {} folds",
            labels.len(),
            n_folds
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let groups = shuffled_groups(labels, &mut rng);
    let largest = groups.iter().map(Vec::len).max().unwrap_or(0);
    if n_folds > largest {
        return Err(Error::Training(format!(
            "n_splits={} cannot be greater than the number of members in each class",
            n_folds
        )));
    }

    let mut assignment = vec![0usize; labels.len()];
    let mut offset = 0;
    for members in &groups {
        for (position, &sample) in members.iter().enumerate() {
            assignment[sample] = (offset + position) % n_folds;
        }
        offset += members.len();
    }

    Ok((0..n_folds)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&i| assignment[i] == fold);
            Fold { train, test }
        })
        .collect())
}

/// Hold out roughly `test_size` of each label.
///
/// Every label with two or more samples keeps at least one sample on each
/// side; singleton labels stay in the training set.
pub fn stratified_train_test_split<L: AsRef<str>>(
    labels: &[L],
    test_size: f64,
    seed: u64,
) -> Result<Fold> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut test = Vec::new();
    let mut train = Vec::new();
    for members in shuffled_groups(labels, &mut rng) {
        let n = members.len();
        let n_test = if n < 2 {
            0
        } else {
            ((n as f64 * test_size).round() as usize).clamp(1, n - 1)
        };
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }
    test.sort_unstable();
    train.sort_unstable();
    Ok(Fold { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<&'static str> {
        let mut v = vec!["a"; 6];
        v.extend(vec!["b"; 4]);
        v
    }

    #[test]
    fn test_folds_partition_samples() {
        let labels = labels();
        let folds = stratified_k_fold(&labels, 2, 42).unwrap();
        assert_eq!(folds.len(), 2);

        let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..labels.len()).collect::<Vec<_>>());

        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), labels.len());
            assert_eq!(fold.test.iter().filter(|&&i| labels[i] == "a").count(), 3);
            assert_eq!(fold.test.iter().filter(|&&i| labels[i] == "b").count(), 2);
        }
    }

    #[test]
    fn test_fold_errors() {
        let labels = labels();
        assert!(stratified_k_fold(&labels, 1, 0).is_err());
        assert!(stratified_k_fold(&labels, 11, 0).is_err());
        assert!(stratified_k_fold(&labels, 7, 0).is_err());
    }

    #[test]
    fn test_seeded() {
        let labels = labels();
        assert_eq!(
            stratified_k_fold(&labels, 3, 7).unwrap(),
            stratified_k_fold(&labels, 3, 7).unwrap()
        );
    }

    #[test]
    fn test_train_test_split() {
        let labels = labels();
        let split = stratified_train_test_split(&labels, 0.5, 1).unwrap();
        assert_eq!(split.test.len(), 5);
        assert_eq!(split.train.len(), 5);
        assert!(stratified_train_test_split(&labels, 1.0, 1).is_err());

        let singleton = ["a", "a", "b"];
        let split = stratified_train_test_split(&singleton, 0.5, 1).unwrap();
        assert!(split.train.contains(&2));
    }
}
