//! Gaussian naive Bayes

use std::f64::consts::PI;

use ndarray::{Array1, Array2, Axis};
use serde::Deserialize;

use super::classifier::Classifier;
use super::{check_binary_classes, check_feature_names, matrix_from_rows};
use crate::error::{ModelError, ModelResult};
use crate::record::FeatureFrame;

#[derive(Debug, Deserialize)]
struct GaussianNbArtifact {
    class_prior: Vec<f64>,
    /// Per-class feature means
    theta: Vec<Vec<f64>>,
    /// Per-class feature variances (smoothing already applied)
    var: Vec<Vec<f64>>,
    classes: Vec<i64>,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "GaussianNbArtifact")]
pub struct GaussianNb {
    log_prior: Array1<f64>,
    theta: Array2<f64>,
    var: Array2<f64>,
    classes: Vec<i64>,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<GaussianNbArtifact> for GaussianNb {
    type Error = ModelError;

    fn try_from(raw: GaussianNbArtifact) -> ModelResult<Self> {
        check_binary_classes(&raw.classes)?;
        let theta = matrix_from_rows(raw.theta, "theta")?;
        let var = matrix_from_rows(raw.var, "var")?;

        if theta.dim() != var.dim() || theta.nrows() != raw.classes.len() {
            return Err(ModelError::invalid(format!(
                "theta {:?} and var {:?} must both be ({}, n_features)",
                theta.dim(),
                var.dim(),
                raw.classes.len()
            )));
        }
        if raw.class_prior.len() != raw.classes.len() {
            return Err(ModelError::invalid("class_prior length differs from classes"));
        }
        if var.iter().any(|v| !(*v > 0.0)) {
            return Err(ModelError::invalid("var must be strictly positive"));
        }
        check_feature_names(raw.feature_names_in.as_deref(), theta.ncols())?;

        Ok(Self {
            log_prior: raw.class_prior.iter().map(|p| p.ln()).collect(),
            theta,
            var,
            classes: raw.classes,
            feature_names_in: raw.feature_names_in,
        })
    }
}

impl GaussianNb {
    /// Unnormalized log posterior per class
    fn joint_log_likelihood(&self, x: &FeatureFrame) -> Array1<f64> {
        let row = x.values();
        let mut jll = self.log_prior.clone();
        for (c, (mean, var)) in self
            .theta
            .axis_iter(Axis(0))
            .zip(self.var.axis_iter(Axis(0)))
            .enumerate()
        {
            let norm: f64 = var.iter().map(|v| (2.0 * PI * v).ln()).sum();
            let dev: f64 = row
                .iter()
                .zip(mean.iter().zip(var.iter()))
                .map(|(xi, (m, v))| (xi - m).powi(2) / v)
                .sum();
            jll[c] += -0.5 * norm - 0.5 * dev;
        }
        jll
    }
}

impl Classifier for GaussianNb {
    fn kind(&self) -> &'static str {
        "gaussian_nb"
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.theta.ncols()
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn proba_unchecked(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        let jll = self.joint_log_likelihood(x);
        let max = jll.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let log_norm = max + jll.mapv(|v| (v - max).exp()).sum().ln();
        Ok(jll.mapv(|v| (v - log_norm).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model() -> GaussianNb {
        serde_json::from_value(serde_json::json!({
            "class_prior": [0.5, 0.5],
            "theta": [[0.0, 0.0], [4.0, 4.0]],
            "var": [[1.0, 1.0], [1.0, 1.0]],
            "classes": [0, 1]
        }))
        .unwrap()
    }

    #[test]
    fn test_midpoint_is_even() {
        let proba = model().predict_proba(&FeatureFrame::bare(array![2.0, 2.0])).unwrap();
        assert!((proba[0] - 0.5).abs() < 1e-12);
        assert!((proba[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_closer_class_wins() {
        let m = model();
        let row = FeatureFrame::bare(array![3.5, 4.2]);
        assert_eq!(m.predict(&row).unwrap(), 1);
        assert!(m.predict_proba(&row).unwrap()[1] > 0.99);
    }

    #[test]
    fn test_far_point_does_not_underflow() {
        let proba = model().predict_proba(&FeatureFrame::bare(array![500.0, 500.0])).unwrap();
        assert!(proba.iter().all(|p| p.is_finite()));
        assert!((proba.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_rejected() {
        let err = serde_json::from_value::<GaussianNb>(serde_json::json!({
            "class_prior": [0.5, 0.5],
            "theta": [[0.0], [1.0]],
            "var": [[0.0], [1.0]],
            "classes": [0, 1]
        }));
        assert!(err.is_err());
    }
}
