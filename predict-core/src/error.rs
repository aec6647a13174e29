//! Error types

use std::path::PathBuf;

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while scaling or classifying a feature row
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{context}: expected {expected} features, got {found}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("feature names should match those seen at fit time: expected {expected:?}, got {found:?}")]
    FeatureNamesMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("{kind} does not support probability estimates")]
    ProbabilityUnsupported { kind: &'static str },

    #[error("{field} must be a finite value >= 0, got {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("{context} produced a non-finite value")]
    NonFinite { context: String },

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

impl ModelError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ModelError::InvalidArtifact(msg.into())
    }
}

/// Errors raised while loading artifacts from disk
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode artifact {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
