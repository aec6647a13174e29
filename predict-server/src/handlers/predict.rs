//! JSON prediction API

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use cardio_predict_core::{inference, ModelPrediction, ModelProbability, PatientRecord};

use crate::{AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub age: f64,
    pub ck_mb: f64,
    pub troponin: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub record: PatientRecord,
    pub scaled: Vec<f64>,
    pub predictions: Vec<ModelPrediction>,
    pub probabilities: Vec<ModelProbability>,
}

/// Run all models on one record
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictResponse>> {
    let record = PatientRecord::new(req.age, req.ck_mb, req.troponin)?;
    let (scaled, report) = inference::run(&state.artifacts, &record)?;

    Ok(Json(PredictResponse {
        record,
        scaled: scaled.to_vec(),
        predictions: report.predictions,
        probabilities: report.probabilities,
    }))
}
