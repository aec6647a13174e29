//! Loaded model listing

use axum::{extract::State, Json};

use cardio_predict_core::model::ModelSummary;

use crate::AppState;

/// Models in inference order with their capabilities
pub async fn list(State(state): State<AppState>) -> Json<Vec<ModelSummary>> {
    Json(state.artifacts.summaries())
}
