use clap::Args;
use serde_json::Value;
use std::path::Path;

use credit_scorecard_core::scoring::batch_items;
use credit_scorecard_core::{PredictionRequest, Scorecard};

use crate::input;

#[derive(Args)]
pub struct PredictArgs {
    /// Application JSON file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct PredictBatchArgs {
    /// JSON array of applications, or an object with an `applications` array
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_predict(
    args: PredictArgs,
    artifacts: Option<&Path>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = PredictionRequest::from_value(input::read_input(args.input.as_deref())?)?;
    let scorecard = Scorecard::load(artifacts)?;
    let result = scorecard.predict(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_predict_batch(
    args: PredictBatchArgs,
    artifacts: Option<&Path>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let items = batch_items(input::read_input(args.input.as_deref())?)?;
    let scorecard = Scorecard::load(artifacts)?;
    let batch = scorecard.predict_batch_values(items);
    Ok(serde_json::to_value(batch)?)
}
