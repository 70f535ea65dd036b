use credit_scorecard_core::artifacts::{ArtifactBundle, BUILTIN_BUNDLE_JSON};
use credit_scorecard_core::scoring::{BatchItem, PredictionRequest, Scorecard};
use credit_scorecard_core::ScorecardError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;

fn scorecard() -> Scorecard {
    Scorecard::builtin().unwrap()
}

/// The regression applicant used throughout the API docs.
fn reference_applicant() -> PredictionRequest {
    PredictionRequest::new()
        .with("annual_inc", 75000)
        .with("int_rate", 12.5)
        .with("credit_history_length", 5.5)
        .with("purpose", "debt_consolidation")
        .with("verification_status", "verified")
}

fn scorecard_with(edit: impl FnOnce(&mut Value)) -> Scorecard {
    let mut value: Value = serde_json::from_str(BUILTIN_BUNDLE_JSON).unwrap();
    edit(&mut value);
    Scorecard::new(ArtifactBundle::from_json_str(&value.to_string()).unwrap()).unwrap()
}

// ===========================================================================
// Regression fixture
// ===========================================================================

#[test]
fn test_reference_applicant_regression() {
    let outcome = scorecard().score(&reference_applicant()).unwrap();

    // log-odds = -2.75 + Σ wᵢ·woeᵢ = -2.9707673
    assert_eq!(outcome.log_odds, dec!(-2.9708));
    assert_eq!(outcome.default_probability, dec!(0.0488));
    assert_eq!(outcome.credit_score, dec!(572.84));
    assert_eq!(outcome.risk_level, "BB");
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_reference_applicant_serialises_as_numbers() {
    let result = scorecard().predict(&reference_applicant()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["risk_level"], json!("BB"));
    let score = json["credit_score"].as_f64().unwrap();
    assert!((score - 572.84).abs() < 1e-9);
}

// ===========================================================================
// Determinism
// ===========================================================================

#[test]
fn test_scoring_is_idempotent() {
    let sc = scorecard();
    let req = reference_applicant().with("revol_util", 71.5).with("purpose", "wedding");
    let first = sc.score(&req).unwrap();
    let second = sc.score(&req).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_independent_instances_agree() {
    let a = scorecard().score(&reference_applicant()).unwrap();
    let b = scorecard().score(&reference_applicant()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_shared_scorecard_scores_identically_across_threads() {
    let sc = Arc::new(scorecard());
    let expected = sc.score(&reference_applicant()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let sc = Arc::clone(&sc);
            thread::spawn(move || {
                (0..25)
                    .map(|_| sc.score(&reference_applicant()).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for outcome in handle.join().unwrap() {
            assert_eq!(outcome, expected);
        }
    }
}

// ===========================================================================
// Output ranges
// ===========================================================================

#[test]
fn test_probability_bounded_across_input_grid() {
    let sc = scorecard();
    let purposes = ["credit_card", "car", "educational", "other", "unknown_purpose"];
    let statuses = ["Verified", "Source Verified", "Not Verified"];
    for income in [1, 20_000, 66_100, 150_000, 10_000_000] {
        for rate in [0.0, 6.0, 12.5, 20.0, 50.0] {
            for purpose in purposes {
                for status in statuses {
                    let req = PredictionRequest::new()
                        .with("annual_inc", income)
                        .with("int_rate", rate)
                        .with("credit_history_length", 4)
                        .with("purpose", purpose)
                        .with("verification_status", status);
                    let out = sc.score(&req).unwrap();
                    assert!(out.default_probability >= Decimal::ZERO);
                    assert!(out.default_probability <= Decimal::ONE);
                    let labels: Vec<&str> = sc.bundle().rating_table.labels().collect();
                    assert!(labels.contains(&out.risk_level.as_str()));
                }
            }
        }
    }
}

#[test]
fn test_extreme_positive_log_odds_gives_finite_score() {
    let sc = scorecard_with(|v| v["model"]["intercept"] = json!(1000));
    let out = sc.score(&reference_applicant()).unwrap();
    assert_eq!(out.default_probability, Decimal::ONE);
    // offset − factor·ln((1 − ε)/ε) ≈ 487.12 − 597.94
    assert!(out.credit_score < dec!(-100) && out.credit_score > dec!(-120));
    assert_eq!(out.risk_level, "D");
}

#[test]
fn test_extreme_negative_log_odds_gives_finite_score() {
    let sc = scorecard_with(|v| v["model"]["intercept"] = json!(-1000));
    let out = sc.score(&reference_applicant()).unwrap();
    assert_eq!(out.default_probability, Decimal::ZERO);
    assert!(out.credit_score > dec!(1000) && out.credit_score < dec!(1100));
    assert_eq!(out.risk_level, "AAA");
}

// ===========================================================================
// Monotonicity
// ===========================================================================

#[test]
fn test_higher_income_never_raises_default_probability() {
    // annual_inc WOE increases with income and its weight is negative.
    let sc = scorecard();
    let mut previous: Option<Decimal> = None;
    for income in [5_000, 43_202, 43_203, 60_000, 70_000, 90_000, 100_130, 500_000] {
        let out = sc
            .score(&reference_applicant().with("annual_inc", income).with("loan_burden", 0.1))
            .unwrap();
        if let Some(prev) = previous {
            assert!(
                out.default_probability <= prev,
                "income {income}: {} > {prev}",
                out.default_probability
            );
        }
        previous = Some(out.default_probability);
    }
}

#[test]
fn test_higher_rate_never_lowers_default_probability() {
    let sc = scorecard();
    let mut previous: Option<Decimal> = None;
    for rate in [1.0, 7.275, 8.0, 12.0, 15.0, 19.0, 30.0, 50.0] {
        let out = sc.score(&reference_applicant().with("int_rate", rate)).unwrap();
        if let Some(prev) = previous {
            assert!(out.default_probability >= prev);
        }
        previous = Some(out.default_probability);
    }
}

// ===========================================================================
// Rating table
// ===========================================================================

#[test]
fn test_every_score_maps_to_exactly_one_band() {
    let table = scorecard().bundle().rating_table.clone();
    let mut probes = vec![dec!(-1000000), dec!(0), dec!(1000000)];
    for band in &table.bands {
        probes.push(band.min_score);
        probes.push(band.min_score - dec!(0.01));
        probes.push(band.min_score + dec!(0.01));
    }
    for score in probes {
        let matching: Vec<&str> = table
            .bands
            .iter()
            .enumerate()
            .filter(|(i, band)| {
                let ceiling = if *i == 0 {
                    None
                } else {
                    Some(table.bands[i - 1].min_score)
                };
                score >= band.min_score && ceiling.map_or(true, |c| score < c)
            })
            .map(|(_, band)| band.label.as_str())
            .collect();
        let lowest = table.bands.last().unwrap().min_score;
        let expected = if score < lowest {
            table.floor_label.as_str()
        } else {
            assert_eq!(matching.len(), 1, "score {score} matched {matching:?}");
            matching[0]
        };
        assert_eq!(table.rate(score), expected);
    }
}

// ===========================================================================
// Categories
// ===========================================================================

#[test]
fn test_unknown_category_does_not_raise() {
    let sc = scorecard();
    let known = sc
        .score(&reference_applicant().with("purpose", "other"))
        .unwrap();
    let unknown = sc
        .score(&reference_applicant().with("purpose", "vacation"))
        .unwrap();
    // both resolve to WOE 0.0 in the builtin bundle
    assert_eq!(known.credit_score, unknown.credit_score);
    assert_eq!(unknown.warnings.len(), 1);
}

#[test]
fn test_unknown_category_uses_configured_unknown_woe() {
    let sc = scorecard_with(|v| {
        for feature in v["features"].as_array_mut().unwrap() {
            if feature["name"] == "purpose" {
                feature["unknown_woe"] = json!(-1.2466);
            }
        }
    });
    let educational = sc
        .score(&reference_applicant().with("purpose", "educational"))
        .unwrap();
    let unknown = sc
        .score(&reference_applicant().with("purpose", "vacation"))
        .unwrap();
    assert_eq!(educational.credit_score, unknown.credit_score);
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_missing_required_field_is_validation_error() {
    let mut req = reference_applicant();
    req.remove("verification_status");
    match scorecard().predict(&req) {
        Err(ScorecardError::Validation { field, .. }) => {
            assert_eq!(field, "verification_status")
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_optional_fields_may_be_absent_or_null() {
    let sc = scorecard();
    let plain = sc.score(&reference_applicant()).unwrap();
    let nulls = sc
        .score(
            &reference_applicant()
                .with("revol_util", Value::Null)
                .with("tot_cur_bal", ""),
        )
        .unwrap();
    assert_eq!(plain, nulls);
}

// ===========================================================================
// Batch
// ===========================================================================

#[test]
fn test_batch_isolates_malformed_item() {
    let sc = scorecard();
    let mut malformed = reference_applicant();
    malformed.remove("annual_inc");
    let requests = vec![
        reference_applicant(),
        malformed,
        reference_applicant().with("purpose", "car"),
    ];

    let batch = sc.predict_batch(&requests);
    assert_eq!(batch.total_applications, 3);
    assert_eq!(batch.failed, 1);

    match &batch.predictions[0] {
        BatchItem::Ok { index, result } => {
            assert_eq!(*index, 0);
            assert_eq!(result.outcome, sc.score(&requests[0]).unwrap());
        }
        other => panic!("item 0 should succeed: {other:?}"),
    }
    match &batch.predictions[1] {
        BatchItem::Error { index, field, .. } => {
            assert_eq!(*index, 1);
            assert_eq!(field.as_deref(), Some("annual_inc"));
        }
        other => panic!("item 1 should fail: {other:?}"),
    }
    assert!(batch.predictions[2].is_ok());
}

#[test]
fn test_batch_json_shape() {
    let mut malformed = reference_applicant();
    malformed.remove("int_rate");
    let batch = scorecard().predict_batch(&[reference_applicant(), malformed]);
    let json = serde_json::to_value(&batch).unwrap();
    assert_eq!(json["predictions"][0]["status"], json!("ok"));
    assert_eq!(json["predictions"][1]["status"], json!("error"));
    assert_eq!(json["predictions"][1]["field"], json!("int_rate"));
    assert_eq!(json["total_applications"], json!(2));
}

// ===========================================================================
// Artifact loading
// ===========================================================================

#[test]
fn test_load_bundle_from_file() {
    let path = std::env::temp_dir().join(format!(
        "credit-scorecard-bundle-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, BUILTIN_BUNDLE_JSON).unwrap();
    let from_file = Scorecard::from_path(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let a = from_file.score(&reference_applicant()).unwrap();
    let b = scorecard().score(&reference_applicant()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_load_without_path_uses_builtin() {
    let sc = Scorecard::load(None).unwrap();
    assert_eq!(sc.bundle().metadata.version, "1.0.0");
}
