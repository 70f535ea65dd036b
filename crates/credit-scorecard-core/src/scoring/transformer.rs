//! Probability → PDO-scaled credit score → rating band.
//!
//! score = offset − factor · ln(p / (1 − p)), where
//! factor = PDO / ln 2 and offset = base_score − factor · ln(base_odds).

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::artifacts::{RatingTable, ScoreConfig};
use crate::types::{Probability, Score};
use crate::{ScorecardError, ScorecardResult};

const LN2: Decimal = dec!(0.6931471805599453);

/// Probabilities are kept inside (ε, 1 − ε) before taking ln(odds).
pub const PROBABILITY_EPSILON: Decimal = dec!(0.000000001);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTransform {
    pub score: Score,
    pub rating: String,
}

/// Linear scaling terms derived from the score config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub factor: Decimal,
    pub offset: Decimal,
}

pub fn scaling(config: &ScoreConfig) -> ScorecardResult<Scaling> {
    let ln_base_odds = config
        .base_odds
        .checked_ln()
        .ok_or_else(|| ScorecardError::Internal("ln(base_odds) is undefined".into()))?;
    let factor = config.pdo / LN2;
    Ok(Scaling {
        factor,
        offset: config.base_score - factor * ln_base_odds,
    })
}

pub fn clamp_probability(p: Probability) -> Probability {
    p.max(PROBABILITY_EPSILON)
        .min(Decimal::ONE - PROBABILITY_EPSILON)
}

pub fn transform(
    config: &ScoreConfig,
    table: &RatingTable,
    probability: Probability,
) -> ScorecardResult<ScoreTransform> {
    let Scaling { factor, offset } = scaling(config)?;

    let p = clamp_probability(probability);
    let odds = p / (Decimal::ONE - p);
    let ln_odds = odds
        .checked_ln()
        .ok_or_else(|| ScorecardError::Internal(format!("ln(odds) undefined for p = {p}")))?;

    let score = offset - factor * ln_odds;
    Ok(ScoreTransform {
        rating: table.rate(score).to_string(),
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::RatingBand;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn config() -> ScoreConfig {
        ScoreConfig {
            pdo: dec!(20),
            base_score: dec!(600),
            base_odds: dec!(50),
        }
    }

    fn table() -> RatingTable {
        RatingTable {
            bands: vec![
                RatingBand {
                    min_score: dec!(700),
                    label: "Low Risk".into(),
                },
                RatingBand {
                    min_score: dec!(600),
                    label: "Medium Risk".into(),
                },
                RatingBand {
                    min_score: dec!(500),
                    label: "High Risk".into(),
                },
            ],
            floor_label: "Very High Risk".into(),
        }
    }

    #[test]
    fn test_factor_and_offset() {
        let s = scaling(&config()).unwrap();
        assert!(approx_eq(s.factor, dec!(28.8539), dec!(0.001)));
        // 600 - 28.8539 * ln(50)
        assert!(approx_eq(s.offset, dec!(487.1229), dec!(0.001)));
    }

    #[test]
    fn test_even_odds_scores_at_offset() {
        let out = transform(&config(), &table(), dec!(0.5)).unwrap();
        let s = scaling(&config()).unwrap();
        assert!(approx_eq(out.score, s.offset, dec!(0.0000001)));
    }

    #[test]
    fn test_doubling_odds_moves_score_by_pdo() {
        // odds 1:3 (p = 0.25) vs 2:3 (p = 0.4): ratio 2
        let a = transform(&config(), &table(), dec!(0.25)).unwrap();
        let b = transform(&config(), &table(), dec!(0.4)).unwrap();
        assert!(approx_eq(a.score - b.score, dec!(20), dec!(0.0001)));
    }

    #[test]
    fn test_lower_probability_scores_higher() {
        let good = transform(&config(), &table(), dec!(0.02)).unwrap();
        let bad = transform(&config(), &table(), dec!(0.3)).unwrap();
        assert!(good.score > bad.score);
    }

    #[test]
    fn test_probability_zero_and_one_are_finite() {
        let zero = transform(&config(), &table(), Decimal::ZERO).unwrap();
        let one = transform(&config(), &table(), Decimal::ONE).unwrap();
        assert!(zero.score > one.score);
        assert_eq!(zero.rating, "Low Risk");
        assert_eq!(one.rating, "Very High Risk");
    }

    #[test]
    fn test_clamp_probability() {
        assert_eq!(clamp_probability(Decimal::ZERO), PROBABILITY_EPSILON);
        assert_eq!(
            clamp_probability(Decimal::ONE),
            Decimal::ONE - PROBABILITY_EPSILON
        );
        assert_eq!(clamp_probability(dec!(0.3)), dec!(0.3));
    }

    #[test]
    fn test_rating_follows_score() {
        // p = 0.1: ln(1/9) = -2.1972 → 487.12 + 63.40 = 550.52
        let out = transform(&config(), &table(), dec!(0.1)).unwrap();
        assert!(approx_eq(out.score, dec!(550.52), dec!(0.01)));
        assert_eq!(out.rating, "High Risk");
    }
}
