//! Multi-Model Inference
//!
//! Runs every classifier over the same scaled row, in registry order.
//! The first failing model aborts the pass; no partial report is returned.

use std::borrow::Cow;

use serde::Serialize;

use crate::constants::{NEGATIVE_LABEL, POSITIVE_CLASS_INDEX, POSITIVE_LABEL};
use crate::error::{ModelError, ModelResult};
use crate::model::{ArtifactSet, Classifier};
use crate::record::{FeatureFrame, PatientRecord};

#[cfg(test)]
mod tests;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// How a label is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Label 1: error-styled banner
    High,
    /// Label 0: success-styled banner
    Low,
    /// Any other label: no banner
    Unknown,
}

impl Verdict {
    pub fn from_label(label: i64) -> Self {
        match label {
            POSITIVE_LABEL => Verdict::High,
            NEGATIVE_LABEL => Verdict::Low,
            _ => Verdict::Unknown,
        }
    }

    /// Banner text for a model, if this verdict has one
    pub fn banner(&self, model: &str) -> Option<String> {
        match self {
            Verdict::High => Some(format!("🔴 {model}: ¡Alta probabilidad de infarto!")),
            Verdict::Low => Some(format!("🟢 {model}: Baja probabilidad de infarto.")),
            Verdict::Unknown => None,
        }
    }
}

/// Result of one model for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPrediction {
    pub model: String,
    pub label: i64,
    /// Positive-class probability, absent for label-only models
    pub probability: Option<f64>,
    pub verdict: Verdict,
}

impl ModelPrediction {
    /// "Probabilidad de infarto: 12.34%" or the no-probability notice
    pub fn probability_text(&self) -> String {
        match self.probability {
            Some(p) => format!("Probabilidad de infarto: {}", format_percent(p, 2)),
            None => "No disponible probabilidad.".to_string(),
        }
    }

    pub fn banner(&self) -> Option<String> {
        self.verdict.banner(&self.model)
    }
}

/// One entry of the probability comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelProbability {
    pub model: String,
    pub probability: f64,
}

/// All predictions of one pass, plus the probabilities in the same order
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PredictionReport {
    pub predictions: Vec<ModelPrediction>,
    /// Only models that produced a probability
    pub probabilities: Vec<ModelProbability>,
}

/// `0.1234` -> `"12.34%"`
pub fn format_percent(p: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, p * 100.0)
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Scale a record with the loaded scaler.
///
/// Runs on every request, whether or not predictions are asked for.
pub fn preprocess(artifacts: &ArtifactSet, record: &PatientRecord) -> ModelResult<FeatureFrame> {
    let scaled = artifacts.scaler().transform(&record.to_frame())?;
    if scaled.values().iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite { context: format!("{} scaler", artifacts.scaler().kind()) });
    }
    Ok(scaled)
}

/// Give the row the model's own training-time column names when it has them.
///
/// Models without recorded names get the bare row. The values are the same
/// either way.
pub fn prepare_input<'a>(model: &dyn Classifier, scaled: &'a FeatureFrame) -> ModelResult<Cow<'a, FeatureFrame>> {
    match model.feature_names_in() {
        Some(names) => Ok(Cow::Owned(scaled.with_columns(names)?)),
        None => {
            log::debug!("{} has no feature names, passing bare row", model.kind());
            Ok(Cow::Borrowed(scaled))
        }
    }
}

/// Run each model over `scaled`, in iteration order
pub fn predict_all<'a, I>(models: I, scaled: &FeatureFrame) -> ModelResult<PredictionReport>
where
    I: IntoIterator<Item = (&'a str, &'a dyn Classifier)>,
{
    let mut report = PredictionReport::default();

    for (name, model) in models {
        let input = prepare_input(model, scaled)?;
        let label = model.predict(&input)?;

        let probability = if model.supports_proba() {
            let proba = model.predict_proba(&input)?;
            let p = proba[POSITIVE_CLASS_INDEX];
            if !p.is_finite() {
                return Err(ModelError::NonFinite { context: name.to_string() });
            }
            report.probabilities.push(ModelProbability { model: name.to_string(), probability: p });
            Some(p)
        } else {
            None
        };

        log::debug!("{}: label={} probability={:?}", name, label, probability);

        report.predictions.push(ModelPrediction {
            model: name.to_string(),
            label,
            probability,
            verdict: Verdict::from_label(label),
        });
    }

    Ok(report)
}

/// Full pass: scale the record, then run every loaded model
pub fn run(artifacts: &ArtifactSet, record: &PatientRecord) -> ModelResult<(FeatureFrame, PredictionReport)> {
    let scaled = preprocess(artifacts, record)?;
    let report = predict_all(artifacts.models(), &scaled)?;
    Ok((scaled, report))
}
