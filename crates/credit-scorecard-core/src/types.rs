use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ScorecardError, ScorecardResult};

/// Weight-of-Evidence value for a single bin.
pub type Woe = Decimal;

/// Regression coefficient applied to a WOE value.
pub type Weight = Decimal;

/// Probability of default, always within [0, 1].
pub type Probability = Decimal;

/// Credit score on the PDO-scaled points axis.
pub type Score = Decimal;

/// Bounds a raw numeric input must respect before it is binned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// Treat `min` as a strict lower bound (e.g. income must be > 0).
    #[serde(default)]
    pub min_exclusive: bool,
}

impl ValueRange {
    pub fn check(&self, field: &str, value: Decimal) -> ScorecardResult<()> {
        if let Some(min) = self.min {
            if self.min_exclusive && value <= min {
                return Err(ScorecardError::validation(
                    field,
                    format!("must be greater than {min}, got {value}"),
                ));
            }
            if !self.min_exclusive && value < min {
                return Err(ScorecardError::validation(
                    field,
                    format!("must be at least {min}, got {value}"),
                ));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(ScorecardError::validation(
                    field,
                    format!("must be at most {max}, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// `min <= max` when both are present.
    pub fn is_consistent(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// Metadata attached to every batch computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl ComputationMetadata {
    pub fn new(elapsed_us: u64) -> Self {
        ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        }
    }
}
