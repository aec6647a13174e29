//! Linear models: logistic regression and linear-kernel SVC

use ndarray::Array1;
use serde::Deserialize;

use super::classifier::Classifier;
use super::{binary_proba, check_binary_classes, check_feature_names, matrix_from_rows, sigmoid};
use crate::error::{ModelError, ModelResult};
use crate::record::FeatureFrame;

/// Single separating hyperplane `w·x + b`
#[derive(Debug, Clone)]
struct Hyperplane {
    coef: Array1<f64>,
    intercept: f64,
}

impl Hyperplane {
    fn from_parts(coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> ModelResult<Self> {
        let coef = matrix_from_rows(coef, "coef")?;
        if coef.nrows() != 1 {
            return Err(ModelError::invalid(format!(
                "binary model needs one coef row, got {}",
                coef.nrows()
            )));
        }
        let intercept = match intercept.as_slice() {
            [b] => *b,
            other => {
                return Err(ModelError::invalid(format!(
                    "binary model needs one intercept, got {}",
                    other.len()
                )))
            }
        };
        Ok(Self { coef: coef.row(0).to_owned(), intercept })
    }

    fn width(&self) -> usize {
        self.coef.len()
    }

    fn decision(&self, x: &FeatureFrame) -> f64 {
        self.coef.dot(&x.values()) + self.intercept
    }
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

#[derive(Debug, Deserialize)]
struct LogisticRegressionArtifact {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    classes: Vec<i64>,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

/// Binary logistic regression
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "LogisticRegressionArtifact")]
pub struct LogisticRegression {
    plane: Hyperplane,
    classes: Vec<i64>,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<LogisticRegressionArtifact> for LogisticRegression {
    type Error = ModelError;

    fn try_from(raw: LogisticRegressionArtifact) -> ModelResult<Self> {
        let plane = Hyperplane::from_parts(raw.coef, raw.intercept)?;
        check_binary_classes(&raw.classes)?;
        check_feature_names(raw.feature_names_in.as_deref(), plane.width())?;
        Ok(Self { plane, classes: raw.classes, feature_names_in: raw.feature_names_in })
    }
}

impl LogisticRegression {
    pub fn decision_function(&self, x: &FeatureFrame) -> ModelResult<f64> {
        self.check_input(x)?;
        Ok(self.plane.decision(x))
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.plane.width()
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn proba_unchecked(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        Ok(binary_proba(sigmoid(self.plane.decision(x))))
    }

    fn predict(&self, x: &FeatureFrame) -> ModelResult<i64> {
        let d = self.decision_function(x)?;
        Ok(self.classes[usize::from(d > 0.0)])
    }
}

// ============================================================================
// LINEAR SVC
// ============================================================================

/// Platt scaling parameters.
///
/// Exported so that `P(classes[1]) = 1 / (1 + exp(prob_a * f + prob_b))`,
/// with `f` the decision function.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlattScaling {
    pub prob_a: f64,
    pub prob_b: f64,
}

impl PlattScaling {
    fn positive_probability(&self, decision: f64) -> f64 {
        sigmoid(-(self.prob_a * decision + self.prob_b))
    }
}

#[derive(Debug, Deserialize)]
struct LinearSvcArtifact {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    classes: Vec<i64>,
    #[serde(default)]
    probability: Option<PlattScaling>,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

/// Support vector classifier with a linear kernel.
///
/// Probability estimates exist only when the model was trained with them
/// (Platt parameters present).
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "LinearSvcArtifact")]
pub struct LinearSvc {
    plane: Hyperplane,
    classes: Vec<i64>,
    probability: Option<PlattScaling>,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<LinearSvcArtifact> for LinearSvc {
    type Error = ModelError;

    fn try_from(raw: LinearSvcArtifact) -> ModelResult<Self> {
        let plane = Hyperplane::from_parts(raw.coef, raw.intercept)?;
        check_binary_classes(&raw.classes)?;
        check_feature_names(raw.feature_names_in.as_deref(), plane.width())?;
        Ok(Self {
            plane,
            classes: raw.classes,
            probability: raw.probability,
            feature_names_in: raw.feature_names_in,
        })
    }
}

impl LinearSvc {
    pub fn decision_function(&self, x: &FeatureFrame) -> ModelResult<f64> {
        self.check_input(x)?;
        Ok(self.plane.decision(x))
    }
}

impl Classifier for LinearSvc {
    fn kind(&self) -> &'static str {
        "svc"
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.plane.width()
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn supports_proba(&self) -> bool {
        self.probability.is_some()
    }

    fn proba_unchecked(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        let platt = self
            .probability
            .ok_or(ModelError::ProbabilityUnsupported { kind: self.kind() })?;
        Ok(binary_proba(platt.positive_probability(self.plane.decision(x))))
    }

    // The label follows the hyperplane, not the Platt estimate
    fn predict(&self, x: &FeatureFrame) -> ModelResult<i64> {
        let d = self.decision_function(x)?;
        Ok(self.classes[usize::from(d > 0.0)])
    }
}
