use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::artifacts::ModelParameters;
use crate::types::{Probability, Woe};
use crate::{ScorecardError, ScorecardResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScore {
    pub log_odds: Decimal,
    pub probability: Probability,
}

/// log-odds = intercept + Σ wᵢ·woeᵢ, probability = σ(log-odds).
///
/// A vector whose length differs from the weight vector means the bundle
/// and preprocessor disagree, which is a deployment defect rather than bad
/// input.
pub fn score(model: &ModelParameters, woe: &[Woe]) -> ScorecardResult<LinearScore> {
    if woe.len() != model.weights.len() {
        return Err(ScorecardError::Internal(format!(
            "WOE vector has {} entries, model expects {}",
            woe.len(),
            model.weights.len()
        )));
    }

    let mut log_odds = model.intercept;
    for (weight, value) in model.weights.iter().zip(woe) {
        log_odds = weight
            .checked_mul(*value)
            .and_then(|term| log_odds.checked_add(term))
            .ok_or_else(|| ScorecardError::Internal("log-odds overflow".into()))?;
    }

    Ok(LinearScore {
        log_odds,
        probability: sigmoid(log_odds),
    })
}

/// Logistic function in the form that never exponentiates a positive number,
/// so extreme inputs saturate to 0 or 1 instead of overflowing.
pub fn sigmoid(x: Decimal) -> Probability {
    let z = (-x.abs()).checked_exp().unwrap_or(Decimal::ZERO);
    if x.is_sign_negative() {
        z / (Decimal::ONE + z)
    } else {
        Decimal::ONE / (Decimal::ONE + z)
    }
}
