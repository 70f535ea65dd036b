//! Model description handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use credit_scorecard_core::scoring::{FeatureImportance, ImportanceMethod, ModelInfo};

use crate::{AppError, AppResult, AppState};

#[derive(Serialize)]
pub struct ModelInfoResponse {
    #[serde(flatten)]
    info: ModelInfo,
    /// Scaling parameters under their conventional names.
    scoring_params: Value,
}

pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let info = state.scorecard.model_info();
    let scoring_params = json!({
        "PDO": info.score_config.pdo,
        "BaseScore": info.score_config.base_score,
        "BaseOdds": info.score_config.base_odds,
    });
    Json(ModelInfoResponse {
        info,
        scoring_params,
    })
}

#[derive(Debug, Deserialize)]
pub struct ImportanceQuery {
    pub method: Option<String>,
}

#[derive(Serialize)]
pub struct FeatureImportanceResponse {
    feature_importance: Vec<FeatureImportance>,
    total_features: usize,
    method: String,
}

pub async fn feature_importance(
    State(state): State<AppState>,
    Query(query): Query<ImportanceQuery>,
) -> AppResult<Json<FeatureImportanceResponse>> {
    let method = match query.method.as_deref() {
        Some(raw) => raw
            .parse::<ImportanceMethod>()
            .map_err(|e| AppError::from_scorecard(e, state.config.debug))?,
        None => ImportanceMethod::default(),
    };

    let ranked = state.scorecard.feature_importance(method);
    Ok(Json(FeatureImportanceResponse {
        total_features: ranked.len(),
        method: method.to_string(),
        feature_importance: ranked,
    }))
}
