//! Kernel functions for the maximum-margin classifier.

use super::sparse::SparseVector;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelType {
    /// `x · y`
    Linear,
    /// `exp(-gamma * |x - y|^2)`
    #[default]
    Rbf,
    /// `(gamma * x · y + coef0)^degree`
    Poly,
    /// `tanh(gamma * x · y + coef0)`
    Sigmoid,
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelType::Linear => "linear",
            KernelType::Rbf => "rbf",
            KernelType::Poly => "poly",
            KernelType::Sigmoid => "sigmoid",
        };
        f.write_str(name)
    }
}

impl FromStr for KernelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(KernelType::Linear),
            "rbf" => Ok(KernelType::Rbf),
            "poly" | "polynomial" => Ok(KernelType::Poly),
            "sigmoid" => Ok(KernelType::Sigmoid),
            other => Err(Error::InvalidConfig(format!("unknown kernel '{}'", other))),
        }
    }
}

/// Kernel coefficient for rbf, poly and sigmoid kernels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gamma {
    /// `1 / (n_features * variance of the training matrix)`
    #[default]
    Scale,
    /// `1 / n_features`
    Auto,
    /// A fixed positive value
    Value(f64),
}

impl Gamma {
    /// Resolve to a concrete coefficient for a training matrix.
    ///
    /// The variance is taken over every entry of the dense `rows × n_features`
    /// matrix, zeros included.
    pub fn resolve(&self, rows: &[SparseVector], n_features: usize) -> f64 {
        match *self {
            Gamma::Value(g) => g,
            Gamma::Auto => 1.0 / n_features.max(1) as f64,
            Gamma::Scale => {
                let total = (rows.len() * n_features) as f64;
                if total == 0.0 {
                    return 1.0;
                }
                let (sum, sum_sq) = rows
                    .iter()
                    .flat_map(|row| row.values.iter())
                    .fold((0.0, 0.0), |(s, sq), v| (s + v, sq + v * v));
                let mean = sum / total;
                let variance = sum_sq / total - mean * mean;
                if variance > 0.0 {
                    1.0 / (n_features as f64 * variance)
                } else {
                    1.0
                }
            },
        }
    }
}

/// A kernel with its coefficients resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    /// Kernel family
    pub kind: KernelType,
    /// Resolved gamma
    pub gamma: f64,
    /// Polynomial degree
    pub degree: u32,
    /// Independent term for poly and sigmoid
    pub coef0: f64,
}

impl Kernel {
    /// Evaluate the kernel on two vectors.
    pub fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        match self.kind {
            KernelType::Rbf => {
                self.compute_with_norms(x, x.squared_norm(), y, y.squared_norm())
            },
            _ => self.compute_with_norms(x, 0.0, y, 0.0),
        }
    }

    /// Evaluate the kernel given precomputed squared norms.
    ///
    /// The norms are only read by the rbf kernel.
    pub fn compute_with_norms(
        &self,
        x: &SparseVector,
        x_norm_sq: f64,
        y: &SparseVector,
        y_norm_sq: f64,
    ) -> f64 {
        let dot = x.dot(y);
        match self.kind {
            KernelType::Linear => dot,
            KernelType::Rbf => {
                let dist = (x_norm_sq + y_norm_sq - 2.0 * dot).max(0.0);
                (-self.gamma * dist).exp()
            },
            KernelType::Poly => (self.gamma * dot + self.coef0).powi(self.degree as i32),
            KernelType::Sigmoid => (self.gamma * dot + self.coef0).tanh(),
        }
    }
}
