//! Raw request fields to an ordered WOE vector.
//!
//! The output always has one entry per model feature, in model order.
//! Missing optional inputs fall back to their configured default, derived
//! ratios are filled in before binning, and unrecognized categories take the
//! feature's unknown-category WOE instead of failing the request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::request::PredictionRequest;
use crate::artifacts::{
    ArtifactBundle, CategoricalBinning, Clamp, DerivedRatio, FeatureEncoding, FeatureSpec,
    NumericBinning,
};
use crate::types::Woe;
use crate::{ScorecardError, ScorecardResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatures {
    /// WOE per model feature, in model order.
    pub values: Vec<Woe>,
    /// Clamped values and unrecognized categories.
    pub warnings: Vec<String>,
}

/// Validate `request` against the bundle and encode it as a WOE vector.
pub fn preprocess(
    bundle: &ArtifactBundle,
    request: &PredictionRequest,
) -> ScorecardResult<EncodedFeatures> {
    for aux in &bundle.auxiliary_inputs {
        if let (Some(value), Some(range)) = (request.numeric(&aux.name)?, &aux.range) {
            range.check(&aux.name, value)?;
        }
    }

    let mut values = Vec::with_capacity(bundle.features.len());
    let mut warnings = Vec::new();

    for spec in &bundle.features {
        let woe = match &spec.encoding {
            FeatureEncoding::Numeric(binning) => {
                encode_numeric(bundle, spec, binning, request, &mut warnings)?
            }
            FeatureEncoding::Categorical(binning) => {
                encode_categorical(spec, binning, request, &mut warnings)?
            }
        };
        values.push(woe);
    }

    Ok(EncodedFeatures { values, warnings })
}

fn missing(spec: &FeatureSpec) -> ScorecardError {
    ScorecardError::validation(&spec.name, "required field is missing")
}

// ---------------------------------------------------------------------------
// Numeric
// ---------------------------------------------------------------------------

fn encode_numeric(
    bundle: &ArtifactBundle,
    spec: &FeatureSpec,
    binning: &NumericBinning,
    request: &PredictionRequest,
    warnings: &mut Vec<String>,
) -> ScorecardResult<Woe> {
    let raw = match request.numeric(&spec.name)? {
        Some(value) => {
            if let Some(range) = &binning.range {
                range.check(&spec.name, value)?;
            }
            value
        }
        None if spec.required => return Err(missing(spec)),
        None => binning
            .derived
            .as_ref()
            .and_then(|d| derive_ratio(bundle, d, request).transpose())
            .transpose()?
            .or(binning.default)
            .unwrap_or(Decimal::ZERO),
    };

    let (woe, clamp) = binning.woe_for(raw);
    match clamp {
        Some(Clamp::Below) => warnings.push(format!(
            "{} = {} is below the lowest bin edge {}; clamped to the first bin",
            spec.name, raw, binning.edges[0]
        )),
        Some(Clamp::Above) => warnings.push(format!(
            "{} = {} is above the highest bin edge {}; clamped to the last bin",
            spec.name,
            raw,
            binning.edges[binning.edges.len() - 1]
        )),
        None => {}
    }
    Ok(woe)
}

/// `numerator / (denominator + 1)`; `None` when either side is unavailable.
fn derive_ratio(
    bundle: &ArtifactBundle,
    derived: &DerivedRatio,
    request: &PredictionRequest,
) -> ScorecardResult<Option<Decimal>> {
    let numerator = match request.numeric(&derived.numerator)? {
        Some(v) => v,
        None => match derived.numerator_default {
            Some(v) => v,
            None => return Ok(None),
        },
    };
    let denominator = match request.numeric(&derived.denominator)? {
        Some(v) => v,
        None => match bundle.feature(&derived.denominator).map(|f| &f.encoding) {
            Some(FeatureEncoding::Numeric(n)) => match n.default {
                Some(v) => v,
                None => return Ok(None),
            },
            _ => return Ok(None),
        },
    };
    Ok(numerator.checked_div(denominator + Decimal::ONE))
}

// ---------------------------------------------------------------------------
// Categorical
// ---------------------------------------------------------------------------

fn encode_categorical(
    spec: &FeatureSpec,
    binning: &CategoricalBinning,
    request: &PredictionRequest,
    warnings: &mut Vec<String>,
) -> ScorecardResult<Woe> {
    let label = match request.text(&spec.name)? {
        Some(label) => label,
        None if spec.required => return Err(missing(spec)),
        None => match &binning.default {
            Some(default) => default.clone(),
            None => return Ok(binning.unknown_woe),
        },
    };

    match binning.lookup(&label) {
        Some(woe) => Ok(woe),
        None => {
            warnings.push(format!(
                "{} '{}' is not a known category; using the unknown-category WOE",
                spec.name, label
            ));
            Ok(binning.unknown_woe)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
