//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

/// A sparse vector with strictly increasing indices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseVector {
    /// Number of dimensions
    pub dim: usize,
    /// Indices of non-zero entries, ascending
    pub indices: Vec<usize>,
    /// Values at `indices`
    pub values: Vec<f64>,
}

impl SparseVector {
    /// All-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(index, value)` pairs in any order.
    ///
    /// Zero values are dropped. Indices must be unique and below `dim`.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.retain(|&(_, v)| v != 0.0);
        pairs.sort_by_key(|&(i, _)| i);
        let (indices, values) = pairs.into_iter().unzip();
        Self {
            dim,
            indices,
            values,
        }
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// True when every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Iterate over non-zero `(index, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product by merging the two index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0;
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                },
            }
        }
        sum
    }

    /// Squared Euclidean norm.
    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Scale to unit Euclidean length. Zero vectors are left unchanged.
    pub fn l2_normalize(&mut self) {
        let norm = self.squared_norm().sqrt();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }
}
