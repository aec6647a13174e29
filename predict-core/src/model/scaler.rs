//! Feature Scaler
//!
//! Fitted normalization applied to every record before inference.
//! Only `transform` exists: no inverse, no refit.

use ndarray::Array1;
use serde::Deserialize;

use super::check_feature_names;
use crate::error::{ModelError, ModelResult};
use crate::record::FeatureFrame;

// ============================================================================
// STANDARD SCALER
// ============================================================================

fn enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct StandardScalerArtifact {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default = "enabled")]
    with_mean: bool,
    #[serde(default = "enabled")]
    with_std: bool,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

/// `z = (x - mean) / scale`
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "StandardScalerArtifact")]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<StandardScalerArtifact> for StandardScaler {
    type Error = ModelError;

    fn try_from(raw: StandardScalerArtifact) -> ModelResult<Self> {
        let n = raw.mean.len();
        if n == 0 || raw.scale.len() != n {
            return Err(ModelError::invalid(format!(
                "mean has {} values, scale has {}",
                n,
                raw.scale.len()
            )));
        }
        check_feature_names(raw.feature_names_in.as_deref(), n)?;

        let mean = if raw.with_mean { Array1::from(raw.mean) } else { Array1::zeros(n) };
        // zero scale means a constant feature; it is left unscaled
        let scale = if raw.with_std {
            Array1::from(raw.scale).mapv(|s| if s == 0.0 { 1.0 } else { s })
        } else {
            Array1::ones(n)
        };
        Ok(Self { mean, scale, feature_names_in: raw.feature_names_in })
    }
}

// ============================================================================
// MIN-MAX SCALER
// ============================================================================

#[derive(Debug, Deserialize)]
struct MinMaxScalerArtifact {
    /// Per-feature offset (`feature_range.0 - data_min * scale`)
    min: Vec<f64>,
    /// Per-feature factor (`feature_range span / data range`)
    scale: Vec<f64>,
    #[serde(default = "unit_range")]
    feature_range: (f64, f64),
    #[serde(default)]
    clip: bool,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// `z = x * scale + min`, clamped to `feature_range` when `clip` is set
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "MinMaxScalerArtifact")]
pub struct MinMaxScaler {
    min: Array1<f64>,
    scale: Array1<f64>,
    feature_range: (f64, f64),
    clip: bool,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<MinMaxScalerArtifact> for MinMaxScaler {
    type Error = ModelError;

    fn try_from(raw: MinMaxScalerArtifact) -> ModelResult<Self> {
        let n = raw.min.len();
        if n == 0 || raw.scale.len() != n {
            return Err(ModelError::invalid(format!(
                "min has {} values, scale has {}",
                n,
                raw.scale.len()
            )));
        }
        check_feature_names(raw.feature_names_in.as_deref(), n)?;
        let (lo, hi) = raw.feature_range;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(ModelError::invalid(format!("feature_range ({lo}, {hi}) is empty")));
        }
        Ok(Self {
            min: Array1::from(raw.min),
            scale: Array1::from(raw.scale),
            feature_range: raw.feature_range,
            clip: raw.clip,
            feature_names_in: raw.feature_names_in,
        })
    }
}

// ============================================================================
// SCALER
// ============================================================================

/// Any scaler artifact, selected by its `kind` tag
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl Scaler {
    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard(_) => "standard",
            Scaler::MinMax(_) => "min_max",
        }
    }

    pub fn n_features_in(&self) -> usize {
        match self {
            Scaler::Standard(s) => s.mean.len(),
            Scaler::MinMax(s) => s.min.len(),
        }
    }

    pub fn feature_names_in(&self) -> Option<&[String]> {
        match self {
            Scaler::Standard(s) => s.feature_names_in.as_deref(),
            Scaler::MinMax(s) => s.feature_names_in.as_deref(),
        }
    }

    /// Scale one row. The output carries no column names.
    pub fn transform(&self, x: &FeatureFrame) -> ModelResult<FeatureFrame> {
        if x.width() != self.n_features_in() {
            return Err(ModelError::ShapeMismatch {
                context: format!("{} scaler", self.kind()),
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

        let row = x.values();
        let scaled = match self {
            Scaler::Standard(s) => (&row - &s.mean) / &s.scale,
            Scaler::MinMax(s) => {
                let z = &row * &s.scale + &s.min;
                if s.clip {
                    let (lo, hi) = s.feature_range;
                    z.mapv(|v| v.clamp(lo, hi))
                } else {
                    z
                }
            }
        };
        Ok(FeatureFrame::bare(scaled))
    }
}
