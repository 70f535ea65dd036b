//! Prediction handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use credit_scorecard_core::scoring::{BatchPrediction, PredictionResult};
use credit_scorecard_core::PredictionRequest;

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub applications: Vec<Value>,
}

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(value) = body?;
    let debug = state.config.debug;
    let request =
        PredictionRequest::from_value(value).map_err(|e| AppError::from_scorecard(e, debug))?;

    let result = state
        .scorecard
        .predict(&request)
        .map_err(|e| AppError::from_scorecard(e, debug))?;

    tracing::info!(
        credit_score = %result.outcome.credit_score,
        risk_level = %result.outcome.risk_level,
        elapsed_us = result.elapsed_us,
        "Prediction completed"
    );
    Ok(Json(result))
}

/// Items that are not JSON objects fail individually rather than rejecting
/// the whole batch.
pub async fn predict_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> AppResult<Json<BatchPrediction>> {
    let Json(batch) = body?;
    let result = state.scorecard.predict_batch_values(batch.applications);

    tracing::info!(
        total = result.total_applications,
        failed = result.failed,
        "Batch prediction completed"
    );
    Ok(Json(result))
}
