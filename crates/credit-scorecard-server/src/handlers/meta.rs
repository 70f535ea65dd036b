use axum::Json;
use serde_json::{json, Value};

const SERVICE: &str = "Credit Risk Scorecard API";

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "docs": "/info",
    }))
}

pub async fn info() -> Json<Value> {
    Json(json!({
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Predicts default probability and a PDO-scaled credit score for loan applications",
        "endpoints": {
            "health": "GET /api/v1/health",
            "predict": "POST /api/v1/predict",
            "predict_batch": "POST /api/v1/predict/batch",
            "model_info": "GET /api/v1/model/info",
            "feature_importance": "GET /api/v1/model/feature-importance",
        },
    }))
}
