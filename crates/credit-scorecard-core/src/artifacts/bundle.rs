//! The versioned artifact bundle exported by the offline training job.
//!
//! A bundle is parsed once, validated as a whole, and then treated as
//! read-only for the life of the process. Any structural defect surfaces as
//! [`ScorecardError::Artifact`] so the caller can refuse to start.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::feature_spec::{AuxiliaryInput, FeatureEncoding, FeatureKind, FeatureSpec};
use super::model::{ModelMetadata, ModelParameters};
use super::score_config::{RatingTable, ScoreConfig};
use crate::{ScorecardError, ScorecardResult};

/// Bundle compiled into the crate, used when no artifact path is configured.
pub const BUILTIN_BUNDLE_JSON: &str = include_str!("../../models/default_bundle.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub metadata: ModelMetadata,
    pub features: Vec<FeatureSpec>,
    #[serde(default)]
    pub auxiliary_inputs: Vec<AuxiliaryInput>,
    pub model: ModelParameters,
    pub score_config: ScoreConfig,
    pub rating_table: RatingTable,
}

impl ArtifactBundle {
    /// Parse and validate a bundle from its JSON text.
    pub fn from_json_str(json: &str) -> ScorecardResult<Self> {
        let mut bundle: ArtifactBundle = serde_json::from_str(json)
            .map_err(|e| ScorecardError::artifact("bundle", format!("malformed JSON: {e}")))?;
        bundle.validate()?;
        tracing::info!(
            version = %bundle.metadata.version,
            features = bundle.features.len(),
            bands = bundle.rating_table.bands.len(),
            "artifact bundle loaded"
        );
        Ok(bundle)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScorecardResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ScorecardError::artifact(
                path.display().to_string(),
                format!("failed to read bundle: {e}"),
            )
        })?;
        Self::from_json_str(&contents)
    }

    pub fn builtin() -> ScorecardResult<Self> {
        Self::from_json_str(BUILTIN_BUNDLE_JSON)
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| f.name == name)
    }

    fn is_numeric_input(&self, name: &str) -> bool {
        self.auxiliary_inputs.iter().any(|a| a.name == name)
            || self
                .feature(name)
                .map(|f| f.kind() == FeatureKind::Numeric)
                .unwrap_or(false)
    }

    /// Validate every artifact and reorder `features` to match the model.
    pub fn validate(&mut self) -> ScorecardResult<()> {
        self.model.validate()?;
        self.score_config.validate()?;
        self.rating_table.validate()?;

        let mut names = BTreeSet::new();
        for spec in &mut self.features {
            spec.validate()?;
            if !names.insert(spec.name.clone()) {
                return Err(ScorecardError::artifact(
                    "features",
                    format!("duplicate feature spec '{}'", spec.name),
                ));
            }
        }

        for aux in &self.auxiliary_inputs {
            if names.contains(&aux.name) {
                return Err(ScorecardError::artifact(
                    "auxiliary_inputs",
                    format!("'{}' is both a feature and an auxiliary input", aux.name),
                ));
            }
            if let Some(range) = &aux.range {
                if !range.is_consistent() {
                    return Err(ScorecardError::artifact(&aux.name, "range min exceeds max"));
                }
            }
        }

        for name in &self.model.features {
            if !names.contains(name) {
                return Err(ScorecardError::artifact(
                    "model",
                    format!("no feature spec for model feature '{name}'"),
                ));
            }
        }
        if self.features.len() != self.model.features.len() {
            let unused: Vec<&str> = self
                .features
                .iter()
                .filter(|f| !self.model.features.contains(&f.name))
                .map(|f| f.name.as_str())
                .collect();
            return Err(ScorecardError::artifact(
                "features",
                format!("feature specs not used by the model: {}", unused.join(", ")),
            ));
        }

        for spec in &self.features {
            if let FeatureEncoding::Numeric(n) = &spec.encoding {
                if let Some(derived) = &n.derived {
                    for input in [&derived.numerator, &derived.denominator] {
                        if input == &spec.name {
                            return Err(ScorecardError::artifact(
                                &spec.name,
                                "derived feature cannot reference itself",
                            ));
                        }
                        if !self.is_numeric_input(input) {
                            return Err(ScorecardError::artifact(
                                &spec.name,
                                format!("derived input '{input}' is not a numeric input"),
                            ));
                        }
                    }
                }
            }
        }

        let order = &self.model.features;
        self.features.sort_by_key(|f| {
            order
                .iter()
                .position(|name| name == &f.name)
                .unwrap_or(usize::MAX)
        });
        Ok(())
    }
}
