use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Weight;
use crate::{ScorecardError, ScorecardResult};

/// Fitted logistic-regression parameters. `features` fixes vector order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    pub features: Vec<String>,
    pub weights: Vec<Weight>,
    pub intercept: Decimal,
}

impl ModelParameters {
    pub fn validate(&self) -> ScorecardResult<()> {
        if self.features.is_empty() {
            return Err(ScorecardError::artifact(
                "model",
                "at least one model feature is required",
            ));
        }
        if self.weights.len() != self.features.len() {
            return Err(ScorecardError::artifact(
                "model",
                format!(
                    "{} weights for {} features",
                    self.weights.len(),
                    self.features.len()
                ),
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(ScorecardError::artifact(
                    "model",
                    format!("feature '{name}' listed twice"),
                ));
            }
        }
        Ok(())
    }
}

/// Descriptive fields recorded when the bundle was exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: String,
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_date: Option<NaiveDate>,
}

fn default_model_type() -> String {
    "Logistic Regression with WOE pipeline".to_string()
}
