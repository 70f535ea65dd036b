use clap::{Args, ValueEnum};
use serde_json::{json, Value};
use std::path::Path;

use credit_scorecard_core::scoring::ImportanceMethod;
use credit_scorecard_core::Scorecard;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum MethodArg {
    /// Absolute model weight
    #[default]
    AbsWeight,
    /// Absolute weight times the feature's WOE span
    WoeRange,
}

impl From<MethodArg> for ImportanceMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::AbsWeight => ImportanceMethod::AbsWeight,
            MethodArg::WoeRange => ImportanceMethod::WoeRange,
        }
    }
}

#[derive(Args)]
pub struct FeatureImportanceArgs {
    /// Ranking method
    #[arg(long, value_enum, default_value_t = MethodArg::AbsWeight)]
    pub method: MethodArg,
}

pub fn run_model_info(artifacts: Option<&Path>) -> Result<Value, Box<dyn std::error::Error>> {
    let scorecard = Scorecard::load(artifacts)?;
    Ok(serde_json::to_value(scorecard.model_info())?)
}

pub fn run_feature_importance(
    args: FeatureImportanceArgs,
    artifacts: Option<&Path>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scorecard = Scorecard::load(artifacts)?;
    let method = ImportanceMethod::from(args.method);
    let ranked = scorecard.feature_importance(method);
    Ok(json!({
        "total_features": ranked.len(),
        "method": method.to_string(),
        "feature_importance": ranked,
    }))
}

pub fn run_validate_artifacts(
    artifacts: Option<&Path>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scorecard = Scorecard::load(artifacts)?;
    let bundle = scorecard.bundle();
    Ok(json!({
        "valid": true,
        "source": artifacts
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "builtin".to_string()),
        "version": bundle.metadata.version,
        "features": bundle.model.features.len(),
        "rating_bands": bundle.rating_table.bands.len() + 1,
    }))
}
