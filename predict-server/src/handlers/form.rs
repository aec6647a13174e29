//! Form page handler
//!
//! Every request is one full pass: build the record, scale it, and only
//! when the button was pressed, run the models and draw the chart.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use cardio_predict_core::{inference, render_comparison_chart, PatientRecord};

use crate::views::{self, ResultsView};
use crate::{AppError, AppResult, AppState};

/// Raw form values; blank fields count as 0
#[derive(Debug, Deserialize, Default)]
pub struct FormQuery {
    pub age: Option<String>,
    pub ckmb: Option<String>,
    pub troponin: Option<String>,
    pub predict: Option<String>,
}

impl FormQuery {
    pub fn record(&self) -> AppResult<PatientRecord> {
        let age = parse_field("age", self.age.as_deref())?;
        let ck_mb = parse_field("ckmb", self.ckmb.as_deref())?;
        let troponin = parse_field("troponin", self.troponin.as_deref())?;
        Ok(PatientRecord::new(age, ck_mb, troponin)?)
    }

    pub fn predict_requested(&self) -> bool {
        self.predict.as_deref().is_some_and(|v| !v.is_empty() && v != "0")
    }
}

fn parse_field(name: &str, raw: Option<&str>) -> AppResult<f64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(value) => value
            .parse::<f64>()
            .map_err(|_| AppError::ValidationError(format!("{name} must be a number"))),
    }
}

/// Render the form, and the results when requested
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> AppResult<Html<String>> {
    let record = query.record()?;
    let scaled = inference::preprocess(&state.artifacts, &record)?;
    tracing::debug!(record = ?record.values(), scaled = ?scaled.to_vec(), "record scaled");

    let results = if query.predict_requested() {
        let report = inference::predict_all(state.artifacts.models(), &scaled)?;
        let chart = render_comparison_chart(&report.probabilities)?;
        tracing::info!(
            models = report.predictions.len(),
            with_probability = report.probabilities.len(),
            "prediction pass complete"
        );
        Some(ResultsView { report, chart })
    } else {
        None
    };

    Ok(Html(views::render_page(&record, results.as_ref(), state.background.is_some())))
}
