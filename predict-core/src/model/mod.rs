//! Model Module - Scaler, Classifiers and Artifact Loading
//!
//! Each trained model is exported as a JSON artifact tagged with its `kind`.
//! Artifacts are validated while they are decoded, so a loaded model never
//! fails on its own internal shapes, only on a wrong input row.

pub mod classifier;
pub mod linear;
pub mod loader;
pub mod mlp;
pub mod naive_bayes;
pub mod neighbors;
pub mod scaler;
pub mod tree;

// Re-export common types
pub use classifier::{Classifier, ClassifierModel};
pub use loader::{ArtifactSet, ModelSummary, NamedModel};
pub use scaler::Scaler;

use ndarray::{Array1, Array2};

use crate::error::{ModelError, ModelResult};

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Build a dense matrix from row vectors, rejecting ragged input
pub(crate) fn matrix_from_rows(rows: Vec<Vec<f64>>, what: &str) -> ModelResult<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    if n_rows == 0 || n_cols == 0 {
        return Err(ModelError::invalid(format!("{what} is empty")));
    }
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(ModelError::invalid(format!("{what} has rows of different lengths")));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| ModelError::invalid(format!("{what}: {e}")))
}

/// Binary classifiers must know exactly two class labels
pub(crate) fn check_binary_classes(classes: &[i64]) -> ModelResult<()> {
    if classes.len() != 2 {
        return Err(ModelError::invalid(format!(
            "expected 2 classes, got {}",
            classes.len()
        )));
    }
    Ok(())
}

/// Optional training-time feature names must match the weight width
pub(crate) fn check_feature_names(names: Option<&[String]>, n_features: usize) -> ModelResult<()> {
    match names {
        Some(names) if names.len() != n_features => Err(ModelError::invalid(format!(
            "feature_names_in has {} names for {} features",
            names.len(),
            n_features
        ))),
        _ => Ok(()),
    }
}

/// Numerically stable logistic function
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `[1 - p, p]` for a positive-class probability `p`
pub(crate) fn binary_proba(p_positive: f64) -> Array1<f64> {
    Array1::from(vec![1.0 - p_positive, p_positive])
}

/// Index of the first maximum
pub(crate) fn argmax(values: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
