//! End-to-end scoring over a loaded artifact bundle.
//!
//! A [`Scorecard`] owns one validated [`ArtifactBundle`] and never mutates
//! it, so a single instance can be shared across threads behind an `Arc`.

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::linear;
use super::preprocessor::preprocess;
use super::request::{PredictionRequest, RequestSchema};
use super::transformer::transform;
use crate::artifacts::{ArtifactBundle, RatingTable, ScoreConfig};
use crate::types::{ComputationMetadata, Probability, Score, Weight};
use crate::{ScorecardError, ScorecardResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Deterministic part of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Rounded to 2 dp.
    pub credit_score: Score,
    /// Rounded to 4 dp.
    pub default_probability: Probability,
    pub risk_level: String,
    /// Rounded to 4 dp.
    pub log_odds: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(flatten)]
    pub outcome: ScoreOutcome,
    pub message: String,
    pub elapsed_us: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItem {
    Ok {
        index: usize,
        result: PredictionResult,
    },
    Error {
        index: usize,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        matches!(self, BatchItem::Ok { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub predictions: Vec<BatchItem>,
    pub total_applications: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_date: Option<NaiveDate>,
    pub features_used: Vec<String>,
    pub weight_count: usize,
    pub intercept: Decimal,
    pub required_inputs: Vec<String>,
    pub optional_inputs: Vec<String>,
    pub score_config: ScoreConfig,
    pub rating_table: RatingTable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceMethod {
    /// |weight|
    #[default]
    AbsWeight,
    /// |weight| × (max WOE − min WOE): the largest swing a feature can cause
    /// in log-odds.
    WoeRange,
}

impl std::fmt::Display for ImportanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportanceMethod::AbsWeight => write!(f, "abs_weight"),
            ImportanceMethod::WoeRange => write!(f, "woe_range"),
        }
    }
}

impl FromStr for ImportanceMethod {
    type Err = ScorecardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "abs_weight" | "weight" => Ok(ImportanceMethod::AbsWeight),
            "woe_range" | "woe" => Ok(ImportanceMethod::WoeRange),
            other => Err(ScorecardError::validation(
                "method",
                format!("unknown importance method '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub weight: Weight,
    pub importance: Decimal,
}

// ---------------------------------------------------------------------------
// Scorecard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Scorecard {
    bundle: ArtifactBundle,
    schema: RequestSchema,
}

impl Scorecard {
    pub fn new(mut bundle: ArtifactBundle) -> ScorecardResult<Self> {
        bundle.validate()?;
        let schema = RequestSchema::from_bundle(&bundle);
        Ok(Scorecard { bundle, schema })
    }

    pub fn builtin() -> ScorecardResult<Self> {
        Self::new(ArtifactBundle::builtin()?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScorecardResult<Self> {
        Self::new(ArtifactBundle::from_path(path)?)
    }

    /// Bundle at `path` when given, otherwise the builtin bundle.
    pub fn load(path: Option<&Path>) -> ScorecardResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    pub fn schema(&self) -> &RequestSchema {
        &self.schema
    }

    /// Run the three pipeline stages. Pure: identical requests give
    /// identical outcomes.
    pub fn score(&self, request: &PredictionRequest) -> ScorecardResult<ScoreOutcome> {
        if let Some(field) = self.schema.missing_required(request).first() {
            return Err(ScorecardError::validation(*field, "required field is missing"));
        }
        let encoded = preprocess(&self.bundle, request)?;
        let linear = linear::score(&self.bundle.model, &encoded.values)?;
        let scaled = transform(
            &self.bundle.score_config,
            &self.bundle.rating_table,
            linear.probability,
        )?;

        Ok(ScoreOutcome {
            credit_score: scaled.score.round_dp(2),
            default_probability: linear.probability.round_dp(4),
            risk_level: scaled.rating,
            log_odds: linear.log_odds.round_dp(4),
            warnings: encoded.warnings,
        })
    }

    pub fn predict(&self, request: &PredictionRequest) -> ScorecardResult<PredictionResult> {
        let start = Instant::now();
        let outcome = self.score(request).inspect_err(|e| {
            if let ScorecardError::Internal(msg) = e {
                tracing::error!(error = %msg, "scoring invariant violated");
            }
        })?;
        let elapsed_us = start.elapsed().as_micros() as u64;
        Ok(PredictionResult {
            outcome,
            message: format!(
                "Prediction completed in {:.3}ms",
                Decimal::from(elapsed_us) / Decimal::from(1000)
            ),
            elapsed_us,
        })
    }

    /// Score each request independently; a failing item never affects the
    /// others. Output order matches input order.
    pub fn predict_batch(&self, requests: &[PredictionRequest]) -> BatchPrediction {
        self.run_batch(requests.iter().map(|r| self.predict(r)))
    }

    /// Like [`Scorecard::predict_batch`] over raw JSON items (see
    /// [`batch_items`] for unwrapping a request envelope); an item that is
    /// not an object fails on its own.
    pub fn predict_batch_values(&self, items: Vec<serde_json::Value>) -> BatchPrediction {
        self.run_batch(
            items
                .into_iter()
                .map(|item| PredictionRequest::from_value(item).and_then(|r| self.predict(&r))),
        )
    }

    fn run_batch(
        &self,
        results: impl Iterator<Item = ScorecardResult<PredictionResult>>,
    ) -> BatchPrediction {
        let start = Instant::now();
        let predictions: Vec<BatchItem> = results
            .enumerate()
            .map(|(index, outcome)| match outcome {
                Ok(result) => BatchItem::Ok { index, result },
                Err(e) => BatchItem::Error {
                    index,
                    field: e.field().map(str::to_string),
                    error: e.to_string(),
                },
            })
            .collect();

        let succeeded = predictions.iter().filter(|p| p.is_ok()).count();
        let total = predictions.len();
        BatchPrediction {
            predictions,
            total_applications: total,
            succeeded,
            failed: total - succeeded,
            metadata: ComputationMetadata::new(start.elapsed().as_micros() as u64),
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        let b = &self.bundle;
        ModelInfo {
            model_type: b.metadata.model_type.clone(),
            version: b.metadata.version.clone(),
            training_date: b.metadata.training_date,
            features_used: b.model.features.clone(),
            weight_count: b.model.weights.len(),
            intercept: b.model.intercept,
            required_inputs: self.schema.required.clone(),
            optional_inputs: self.schema.optional.clone(),
            score_config: b.score_config.clone(),
            rating_table: b.rating_table.clone(),
        }
    }

    /// Features ranked by importance, descending; ties broken by name.
    pub fn feature_importance(&self, method: ImportanceMethod) -> Vec<FeatureImportance> {
        let bundle = &self.bundle;
        let mut ranked: Vec<FeatureImportance> = bundle
            .model
            .features
            .iter()
            .zip(&bundle.model.weights)
            .map(|(name, &weight)| {
                let importance = match method {
                    ImportanceMethod::AbsWeight => weight.abs(),
                    ImportanceMethod::WoeRange => {
                        let (lo, hi) = bundle
                            .feature(name)
                            .map(|f| f.woe_span())
                            .unwrap_or((Decimal::ZERO, Decimal::ZERO));
                        weight.abs() * (hi - lo)
                    }
                };
                FeatureImportance {
                    feature: name.clone(),
                    weight,
                    importance,
                }
            })
            .collect();
        ranked.sort_by(|x, y| {
            y.importance
                .cmp(&x.importance)
                .then_with(|| x.feature.cmp(&y.feature))
        });
        ranked
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Unwrap a batch payload: either `[{...}, ...]` or
/// `{"applications": [{...}, ...]}`. Items are not inspected, so a malformed
/// one is still reported individually by [`Scorecard::predict_batch_values`].
pub fn batch_items(value: serde_json::Value) -> ScorecardResult<Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(items) => Ok(items),
        serde_json::Value::Object(mut map) => match map.remove("applications") {
            Some(serde_json::Value::Array(items)) => Ok(items),
            _ => Err(ScorecardError::validation(
                "applications",
                "batch object must carry an 'applications' array",
            )),
        },
        _ => Err(ScorecardError::validation(
            "applications",
            "batch input must be a JSON array or an object with 'applications'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scorecard() -> Scorecard {
        Scorecard::builtin().unwrap()
    }

    fn fixture() -> PredictionRequest {
        PredictionRequest::new()
            .with("annual_inc", 75000)
            .with("int_rate", 12.5)
            .with("credit_history_length", 5.5)
            .with("purpose", "debt_consolidation")
            .with("verification_status", "verified")
    }

    #[test]
    fn test_predict_reports_elapsed_time() {
        let result = scorecard().predict(&fixture()).unwrap();
        assert!(result.message.starts_with("Prediction completed in"));
        assert!(result.message.ends_with("ms"));
    }

    #[test]
    fn test_predict_flattens_outcome_in_json() {
        let result = scorecard().predict(&fixture()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["credit_score"].is_number());
        assert!(json["default_probability"].is_number());
        assert!(json["risk_level"].is_string());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_batch_counts() {
        let mut bad = fixture();
        bad.remove("annual_inc");
        let batch = scorecard().predict_batch(&[fixture(), bad, fixture()]);
        assert_eq!(batch.total_applications, 3);
        assert_eq!(batch.succeeded, 2);
        assert_eq!(batch.failed, 1);
    }

    #[test]
    fn test_batch_error_carries_field() {
        let mut bad = fixture();
        bad.remove("purpose");
        let batch = scorecard().predict_batch(&[bad]);
        match &batch.predictions[0] {
            BatchItem::Error { index, field, .. } => {
                assert_eq!(*index, 0);
                assert_eq!(field.as_deref(), Some("purpose"));
            }
            other => panic!("expected error item, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_values_isolate_non_object_items() {
        let good = serde_json::to_value(fixture()).unwrap();
        let batch = scorecard().predict_batch_values(vec![good, serde_json::json!(42)]);
        assert!(batch.predictions[0].is_ok());
        match &batch.predictions[1] {
            BatchItem::Error { index, field, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(field.as_deref(), Some("request"));
            }
            other => panic!("expected error item, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_items_accepts_array_and_envelope() {
        let items = batch_items(serde_json::json!([{"purpose": "car"}, 42])).unwrap();
        assert_eq!(items.len(), 2);
        let items =
            batch_items(serde_json::json!({"applications": [{"int_rate": 9.5}]})).unwrap();
        assert_eq!(items, vec![serde_json::json!({"int_rate": 9.5})]);
    }

    #[test]
    fn test_batch_items_rejects_other_shapes() {
        for value in [
            serde_json::json!({"apps": []}),
            serde_json::json!({"applications": {}}),
            serde_json::json!("nope"),
        ] {
            let err = batch_items(value).unwrap_err();
            assert_eq!(err.field(), Some("applications"));
        }
    }

    #[test]
    fn test_empty_batch() {
        let batch = scorecard().predict_batch(&[]);
        assert_eq!(batch.total_applications, 0);
        assert!(batch.predictions.is_empty());
    }

    #[test]
    fn test_model_info() {
        let info = scorecard().model_info();
        assert_eq!(info.features_used.len(), 9);
        assert_eq!(info.weight_count, 9);
        assert_eq!(info.score_config.pdo, dec!(20));
        assert_eq!(info.version, "1.0.0");
        assert_eq!(
            info.training_date,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_feature_importance_by_abs_weight() {
        let ranked = scorecard().feature_importance(ImportanceMethod::AbsWeight);
        assert_eq!(ranked.len(), 9);
        assert_eq!(ranked[0].feature, "int_rate");
        assert_eq!(ranked[0].importance, dec!(0.9463));
        assert_eq!(ranked[1].feature, "tot_cur_bal");
        for pair in ranked.windows(2) {
            assert!(pair[0].importance >= pair[1].importance);
        }
    }

    #[test]
    fn test_feature_importance_by_woe_range() {
        let ranked = scorecard().feature_importance(ImportanceMethod::WoeRange);
        // int_rate: 0.9463 * (1.8652 - (-0.97))
        assert_eq!(ranked[0].feature, "int_rate");
        assert_eq!(ranked[0].importance, dec!(0.9463) * dec!(2.8352));
        for pair in ranked.windows(2) {
            assert!(pair[0].importance >= pair[1].importance);
        }
    }

    #[test]
    fn test_importance_method_parsing() {
        assert_eq!(
            "woe-range".parse::<ImportanceMethod>().unwrap(),
            ImportanceMethod::WoeRange
        );
        assert_eq!(
            "ABS_WEIGHT".parse::<ImportanceMethod>().unwrap(),
            ImportanceMethod::AbsWeight
        );
        assert!("gain".parse::<ImportanceMethod>().is_err());
    }
}
