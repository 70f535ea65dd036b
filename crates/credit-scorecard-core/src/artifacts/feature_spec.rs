//! Per-feature binning artifacts.
//!
//! Numeric features carry ascending bin edges with right-inclusive bins:
//! bin `i` covers `(edges[i], edges[i + 1]]`, and the first bin also takes
//! `edges[0]` itself. Values outside `[edges[0], edges[last]]` clamp to the
//! nearest edge bin. Categorical features map normalized labels to a bin
//! index and keep a dedicated WOE for labels never seen during training.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ValueRange, Woe};
use crate::{ScorecardError, ScorecardResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureKind::Numeric => write!(f, "numeric"),
            FeatureKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// One model input: how its raw value is binned and encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    /// Required features reject the request when absent.
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub encoding: FeatureEncoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureEncoding {
    Numeric(NumericBinning),
    Categorical(CategoricalBinning),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericBinning {
    /// Ascending bin edges; `edges.len() - 1` bins.
    pub edges: Vec<Decimal>,
    /// One WOE value per bin.
    pub woe: Vec<Woe>,
    /// Raw value substituted when an optional feature is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedRatio>,
}

/// `numerator / (denominator + 1)`, computed when the caller omits the feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedRatio {
    pub numerator: String,
    pub denominator: String,
    /// Assumed numerator when the request does not carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numerator_default: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalBinning {
    /// Category label → bin index into `woe`.
    pub categories: BTreeMap<String, usize>,
    pub woe: Vec<Woe>,
    /// WOE for labels absent from `categories`.
    #[serde(default)]
    pub unknown_woe: Woe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Which side of the edge range a numeric value fell off, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    Below,
    Above,
}

/// A raw input that feeds a derived feature without being a model feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxiliaryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Canonical form of a category label: trimmed, lowercase, `_` separators.
pub fn normalize_category(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// ---------------------------------------------------------------------------
// FeatureSpec
// ---------------------------------------------------------------------------

impl FeatureSpec {
    pub fn kind(&self) -> FeatureKind {
        match self.encoding {
            FeatureEncoding::Numeric(_) => FeatureKind::Numeric,
            FeatureEncoding::Categorical(_) => FeatureKind::Categorical,
        }
    }

    pub fn woe_values(&self) -> &[Woe] {
        match &self.encoding {
            FeatureEncoding::Numeric(n) => &n.woe,
            FeatureEncoding::Categorical(c) => &c.woe,
        }
    }

    /// Smallest and largest WOE this feature can emit.
    pub fn woe_span(&self) -> (Woe, Woe) {
        let mut values: Vec<Woe> = self.woe_values().to_vec();
        if let FeatureEncoding::Categorical(c) = &self.encoding {
            values.push(c.unknown_woe);
        }
        let min = values.iter().copied().min().unwrap_or(Decimal::ZERO);
        let max = values.iter().copied().max().unwrap_or(Decimal::ZERO);
        (min, max)
    }

    /// Check structural invariants and normalize category labels in place.
    pub fn validate(&mut self) -> ScorecardResult<()> {
        if self.name.trim().is_empty() {
            return Err(ScorecardError::artifact(
                "features",
                "feature name must not be empty",
            ));
        }
        let name = self.name.clone();
        match &mut self.encoding {
            FeatureEncoding::Numeric(n) => n.validate(&name),
            FeatureEncoding::Categorical(c) => c.validate(&name),
        }
    }
}

// ---------------------------------------------------------------------------
// NumericBinning
// ---------------------------------------------------------------------------

impl NumericBinning {
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Index of the bin holding `value`, plus the clamp side when the value
    /// lies outside the edge range.
    pub fn bin_index(&self, value: Decimal) -> (usize, Option<Clamp>) {
        let bins = self.bin_count();
        let first = self.edges[0];
        let last = self.edges[bins];
        if value < first {
            return (0, Some(Clamp::Below));
        }
        if value > last {
            return (bins - 1, Some(Clamp::Above));
        }
        // First upper edge >= value (right-inclusive bins).
        let idx = self.edges[1..].partition_point(|edge| *edge < value);
        (idx.min(bins - 1), None)
    }

    pub fn woe_for(&self, value: Decimal) -> (Woe, Option<Clamp>) {
        let (idx, clamp) = self.bin_index(value);
        (self.woe[idx], clamp)
    }

    fn validate(&self, name: &str) -> ScorecardResult<()> {
        if self.edges.len() < 2 {
            return Err(ScorecardError::artifact(
                name,
                "numeric feature needs at least two bin edges",
            ));
        }
        if self.edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ScorecardError::artifact(
                name,
                "bin edges must be strictly ascending",
            ));
        }
        if self.woe.len() != self.bin_count() {
            return Err(ScorecardError::artifact(
                name,
                format!(
                    "expected {} WOE values for {} edges, found {}",
                    self.bin_count(),
                    self.edges.len(),
                    self.woe.len()
                ),
            ));
        }
        if let Some(range) = &self.range {
            if !range.is_consistent() {
                return Err(ScorecardError::artifact(name, "range min exceeds max"));
            }
            if let Some(default) = self.default {
                range.check(name, default).map_err(|e| {
                    ScorecardError::artifact(name, format!("default outside range: {e}"))
                })?;
            }
        }
        if let Some(derived) = &self.derived {
            if derived.numerator.trim().is_empty() || derived.denominator.trim().is_empty() {
                return Err(ScorecardError::artifact(
                    name,
                    "derived ratio needs numerator and denominator inputs",
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CategoricalBinning
// ---------------------------------------------------------------------------

impl CategoricalBinning {
    /// WOE for a raw label; `None` for an unrecognized category.
    pub fn lookup(&self, raw: &str) -> Option<Woe> {
        self.categories
            .get(&normalize_category(raw))
            .map(|&idx| self.woe[idx])
    }

    fn validate(&mut self, name: &str) -> ScorecardResult<()> {
        if self.woe.is_empty() {
            return Err(ScorecardError::artifact(
                name,
                "categorical feature needs at least one WOE bin",
            ));
        }
        let mut normalized = BTreeMap::new();
        for (label, &idx) in &self.categories {
            if idx >= self.woe.len() {
                return Err(ScorecardError::artifact(
                    name,
                    format!(
                        "category '{label}' points at bin {idx}, only {} bins exist",
                        self.woe.len()
                    ),
                ));
            }
            let key = normalize_category(label);
            if key.is_empty() {
                return Err(ScorecardError::artifact(name, "empty category label"));
            }
            if normalized.insert(key.clone(), idx).is_some() {
                return Err(ScorecardError::artifact(
                    name,
                    format!("category '{label}' collides with another label as '{key}'"),
                ));
            }
        }
        self.categories = normalized;
        if let Some(default) = &self.default {
            let key = normalize_category(default);
            if !self.categories.contains_key(&key) {
                return Err(ScorecardError::artifact(
                    name,
                    format!("default '{default}' is not a known category"),
                ));
            }
            self.default = Some(key);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
