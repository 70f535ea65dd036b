use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::artifacts::ArtifactBundle;
use crate::{ScorecardError, ScorecardResult};

// ---------------------------------------------------------------------------
// PredictionRequest
// ---------------------------------------------------------------------------

/// Raw loan-application fields keyed by input name. Fields the model does not
/// know about are carried along and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    fields: BTreeMap<String, Value>,
}

impl PredictionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Build a request from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> ScorecardResult<Self> {
        match value {
            Value::Object(map) => Ok(PredictionRequest {
                fields: map.into_iter().collect(),
            }),
            other => Err(ScorecardError::validation(
                "request",
                format!("expected a JSON object, got {}", json_kind(&other)),
            )),
        }
    }

    /// Numeric view of a field. `null` and blank strings count as absent.
    pub fn numeric(&self, name: &str) -> ScorecardResult<Option<Decimal>> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => parse_decimal(&n.to_string())
                .map(Some)
                .ok_or_else(|| {
                    ScorecardError::validation(name, format!("{n} is not a representable number"))
                }),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                parse_decimal(trimmed).map(Some).ok_or_else(|| {
                    ScorecardError::validation(name, format!("expected a number, got '{trimmed}'"))
                })
            }
            Some(other) => Err(ScorecardError::validation(
                name,
                format!("expected a number, got {}", json_kind(other)),
            )),
        }
    }

    /// Text view of a field. Numbers are accepted by their decimal form.
    pub fn text(&self, name: &str) -> ScorecardResult<Option<String>> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(ScorecardError::validation(
                name,
                format!("expected a string, got {}", json_kind(other)),
            )),
        }
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// RequestSchema
// ---------------------------------------------------------------------------

/// Input names a request must or may carry, derived from the bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSchema {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

impl RequestSchema {
    pub fn from_bundle(bundle: &ArtifactBundle) -> Self {
        let required = bundle
            .features
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.clone())
            .collect();
        let optional = bundle
            .features
            .iter()
            .filter(|f| !f.required)
            .map(|f| f.name.clone())
            .chain(bundle.auxiliary_inputs.iter().map(|a| a.name.clone()))
            .collect();
        RequestSchema { required, optional }
    }

    /// Names of required inputs that are absent, null or blank.
    pub fn missing_required(&self, request: &PredictionRequest) -> Vec<&str> {
        self.required
            .iter()
            .filter(|name| match request.get(name) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .map(|name| name.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
