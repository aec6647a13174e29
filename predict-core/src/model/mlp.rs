//! Multi-layer perceptron classifier

use ndarray::{Array1, Array2};
use serde::Deserialize;

use super::classifier::Classifier;
use super::{binary_proba, check_binary_classes, check_feature_names, matrix_from_rows, sigmoid};
use crate::error::{ModelError, ModelResult};
use crate::record::FeatureFrame;

/// Hidden-layer activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Logistic,
    Tanh,
    #[default]
    Relu,
}

impl Activation {
    fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Identity => z,
            Activation::Logistic => sigmoid(z),
            Activation::Tanh => z.tanh(),
            Activation::Relu => z.max(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MlpArtifact {
    /// One `(fan_in, fan_out)` weight matrix per layer
    coefs: Vec<Vec<Vec<f64>>>,
    intercepts: Vec<Vec<f64>>,
    #[serde(default)]
    activation: Activation,
    classes: Vec<i64>,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

/// Feed-forward network with a single logistic output unit
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "MlpArtifact")]
pub struct Mlp {
    layers: Vec<(Array2<f64>, Array1<f64>)>,
    activation: Activation,
    classes: Vec<i64>,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<MlpArtifact> for Mlp {
    type Error = ModelError;

    fn try_from(raw: MlpArtifact) -> ModelResult<Self> {
        check_binary_classes(&raw.classes)?;
        if raw.coefs.is_empty() || raw.coefs.len() != raw.intercepts.len() {
            return Err(ModelError::invalid(format!(
                "{} weight matrices for {} intercept vectors",
                raw.coefs.len(),
                raw.intercepts.len()
            )));
        }

        let mut layers = Vec::with_capacity(raw.coefs.len());
        let mut fan_in: Option<usize> = None;
        for (i, (coef, intercept)) in raw.coefs.into_iter().zip(raw.intercepts).enumerate() {
            let w = matrix_from_rows(coef, &format!("coefs[{i}]"))?;
            if let Some(prev) = fan_in {
                if w.nrows() != prev {
                    return Err(ModelError::invalid(format!(
                        "coefs[{i}] expects {} inputs, previous layer gives {prev}",
                        w.nrows()
                    )));
                }
            }
            if intercept.len() != w.ncols() {
                return Err(ModelError::invalid(format!(
                    "intercepts[{i}] has {} values for {} units",
                    intercept.len(),
                    w.ncols()
                )));
            }
            fan_in = Some(w.ncols());
            layers.push((w, Array1::from(intercept)));
        }

        if fan_in != Some(1) {
            return Err(ModelError::invalid("binary MLP needs a single output unit"));
        }
        check_feature_names(raw.feature_names_in.as_deref(), layers[0].0.nrows())?;

        Ok(Self {
            layers,
            activation: raw.activation,
            classes: raw.classes,
            feature_names_in: raw.feature_names_in,
        })
    }
}

impl Mlp {
    /// Output-unit probability of `classes[1]`
    fn forward(&self, x: &FeatureFrame) -> f64 {
        let last = self.layers.len() - 1;
        let mut a = x.values().to_owned();
        for (i, (w, b)) in self.layers.iter().enumerate() {
            let z = a.dot(w) + b;
            a = if i == last {
                z.mapv(sigmoid)
            } else {
                z.mapv(|v| self.activation.apply(v))
            };
        }
        a[0]
    }
}

impl Classifier for Mlp {
    fn kind(&self) -> &'static str {
        "mlp"
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.layers[0].0.nrows()
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn proba_unchecked(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        Ok(binary_proba(self.forward(x)))
    }

    fn predict(&self, x: &FeatureFrame) -> ModelResult<i64> {
        self.check_input(x)?;
        Ok(self.classes[usize::from(self.forward(x) > 0.5)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model() -> Mlp {
        // 2 -> 2 (relu) -> 1
        serde_json::from_value(serde_json::json!({
            "coefs": [
                [[1.0, -1.0], [1.0, -1.0]],
                [[2.0], [-2.0]]
            ],
            "intercepts": [[0.0, 0.0], [-1.0]],
            "activation": "relu",
            "classes": [0, 1]
        }))
        .unwrap()
    }

    #[test]
    fn test_forward_pass() {
        let m = model();
        // hidden = relu([2, -2]) = [2, 0]; out = 4 - 1 = 3
        let row = FeatureFrame::bare(array![1.0, 1.0]);
        let proba = m.predict_proba(&row).unwrap();
        assert!((proba[1] - sigmoid(3.0)).abs() < 1e-12);
        assert_eq!(m.predict(&row).unwrap(), 1);

        // hidden = [0, 0]; out = -1
        let row = FeatureFrame::bare(array![0.0, 0.0]);
        assert_eq!(m.predict(&row).unwrap(), 0);
    }

    #[test]
    fn test_layer_chain_must_connect() {
        let err = serde_json::from_value::<Mlp>(serde_json::json!({
            "coefs": [[[1.0, 1.0]], [[1.0], [1.0], [1.0]]],
            "intercepts": [[0.0, 0.0], [0.0]],
            "classes": [0, 1]
        }));
        assert!(err.is_err());
    }
}
