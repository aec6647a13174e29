//! Background image handler

use std::path::Path;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::{AppError, AppResult, AppState};

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Serve the configured background image
pub async fn image(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let path = state
        .background
        .as_deref()
        .ok_or_else(|| AppError::NotFound("No background image configured".to_string()))?;

    let bytes = tokio::fs::read(path).await?;
    Ok(([(header::CONTENT_TYPE, content_type(path))], bytes))
}
