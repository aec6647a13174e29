//! Classifier trait and the tagged artifact enum

use ndarray::Array1;
use serde::Deserialize;

use super::argmax;
use super::linear::{LinearSvc, LogisticRegression};
use super::mlp::Mlp;
use super::naive_bayes::GaussianNb;
use super::neighbors::KNeighbors;
use super::tree::DecisionTree;
use crate::error::{ModelError, ModelResult};
use crate::record::FeatureFrame;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A trained binary classifier over one feature row
pub trait Classifier {
    /// Short artifact kind, e.g. "logistic_regression"
    fn kind(&self) -> &'static str;

    /// Class labels; `predict_proba` columns follow this order
    fn classes(&self) -> &[i64];

    /// Width of the rows the model was trained on
    fn n_features_in(&self) -> usize;

    /// Column names seen at training time, when the model recorded them
    fn feature_names_in(&self) -> Option<&[String]>;

    /// Per-class probabilities for an already validated row
    fn proba_unchecked(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>>;

    /// Whether `predict_proba` is available
    fn supports_proba(&self) -> bool {
        true
    }

    /// Predicted class label
    fn predict(&self, x: &FeatureFrame) -> ModelResult<i64> {
        self.check_input(x)?;
        let proba = self.proba_unchecked(x)?;
        Ok(self.classes()[argmax(&proba)])
    }

    /// Per-class probabilities in `classes()` order
    fn predict_proba(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        if !self.supports_proba() {
            return Err(ModelError::ProbabilityUnsupported { kind: self.kind() });
        }
        self.check_input(x)?;
        self.proba_unchecked(x)
    }

    /// Width must match; names, when both sides have them, must match too
    fn check_input(&self, x: &FeatureFrame) -> ModelResult<()> {
        if x.width() != self.n_features_in() {
            return Err(ModelError::ShapeMismatch {
                context: self.kind().to_string(),
                expected: self.n_features_in(),
                found: x.width(),
            });
        }
        if let (Some(expected), Some(found)) = (self.feature_names_in(), x.columns()) {
            if expected != found {
                return Err(ModelError::FeatureNamesMismatch {
                    expected: expected.to_vec(),
                    found: found.to_vec(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// ARTIFACT ENUM
// ============================================================================

/// Any classifier artifact, selected by its `kind` tag
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    LogisticRegression(LogisticRegression),
    KNeighbors(KNeighbors),
    GaussianNb(GaussianNb),
    Svc(LinearSvc),
    Mlp(Mlp),
    DecisionTree(DecisionTree),
}

impl ClassifierModel {
    pub fn as_classifier(&self) -> &dyn Classifier {
        match self {
            ClassifierModel::LogisticRegression(m) => m,
            ClassifierModel::KNeighbors(m) => m,
            ClassifierModel::GaussianNb(m) => m,
            ClassifierModel::Svc(m) => m,
            ClassifierModel::Mlp(m) => m,
            ClassifierModel::DecisionTree(m) => m,
        }
    }
}
