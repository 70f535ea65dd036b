//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    version: String,
    timestamp: String,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: true,
        version: state.scorecard.bundle().metadata.version.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
