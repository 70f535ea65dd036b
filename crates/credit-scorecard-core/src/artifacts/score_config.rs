use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Score;
use crate::{ScorecardError, ScorecardResult};

/// Points-to-double-odds scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub pdo: Decimal,
    pub base_score: Decimal,
    pub base_odds: Decimal,
}

impl ScoreConfig {
    pub fn validate(&self) -> ScorecardResult<()> {
        if self.pdo <= Decimal::ZERO {
            return Err(ScorecardError::artifact(
                "score_config.pdo",
                "Points to double odds must be positive.",
            ));
        }
        if self.base_odds <= Decimal::ZERO {
            return Err(ScorecardError::artifact(
                "score_config.base_odds",
                "Base odds must be positive.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBand {
    pub min_score: Score,
    pub label: String,
}

/// Descending score floors. Scores below the lowest floor get `floor_label`,
/// so every real score maps to exactly one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTable {
    pub bands: Vec<RatingBand>,
    pub floor_label: String,
}

impl RatingTable {
    pub fn rate(&self, score: Score) -> &str {
        self.bands
            .iter()
            .find(|band| band.min_score <= score)
            .map(|band| band.label.as_str())
            .unwrap_or(self.floor_label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands
            .iter()
            .map(|b| b.label.as_str())
            .chain(std::iter::once(self.floor_label.as_str()))
    }

    pub fn validate(&self) -> ScorecardResult<()> {
        if self.floor_label.trim().is_empty() {
            return Err(ScorecardError::artifact(
                "rating_table.floor_label",
                "floor label must not be empty",
            ));
        }
        if self.bands.iter().any(|b| b.label.trim().is_empty()) {
            return Err(ScorecardError::artifact(
                "rating_table.bands",
                "band labels must not be empty",
            ));
        }
        if self
            .bands
            .windows(2)
            .any(|w| w[0].min_score <= w[1].min_score)
        {
            return Err(ScorecardError::artifact(
                "rating_table.bands",
                "thresholds must be strictly descending",
            ));
        }
        Ok(())
    }
}
