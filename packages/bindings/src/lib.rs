use napi::Result as NapiResult;
use napi_derive::napi;

use credit_scorecard_core::artifacts::ArtifactBundle;
use credit_scorecard_core::scoring::{batch_items, ImportanceMethod};
use credit_scorecard_core::{PredictionRequest, Scorecard};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Scorecard over `bundle_json`, or the builtin bundle when omitted.
fn load(bundle_json: Option<String>) -> NapiResult<Scorecard> {
    match bundle_json {
        Some(json) => {
            let bundle = ArtifactBundle::from_json_str(&json).map_err(to_napi_error)?;
            Scorecard::new(bundle).map_err(to_napi_error)
        }
        None => Scorecard::builtin().map_err(to_napi_error),
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[napi]
pub fn predict(input_json: String, bundle_json: Option<String>) -> NapiResult<String> {
    let request: PredictionRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = load(bundle_json)?.predict(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Accepts a JSON array of applications or `{"applications": [...]}`.
#[napi]
pub fn predict_batch(input_json: String, bundle_json: Option<String>) -> NapiResult<String> {
    let value: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let items = batch_items(value).map_err(to_napi_error)?;
    let output = load(bundle_json)?.predict_batch_values(items);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[napi]
pub fn model_info(bundle_json: Option<String>) -> NapiResult<String> {
    let output = load(bundle_json)?.model_info();
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `method` is `abs_weight` (default) or `woe_range`.
#[napi]
pub fn feature_importance(
    method: Option<String>,
    bundle_json: Option<String>,
) -> NapiResult<String> {
    let method: ImportanceMethod = match method {
        Some(m) => m.parse().map_err(to_napi_error)?,
        None => ImportanceMethod::default(),
    };
    let output = load(bundle_json)?.feature_importance(method);
    serde_json::to_string(&output).map_err(to_napi_error)
}
