mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::model::FeatureImportanceArgs;
use commands::predict::{PredictArgs, PredictBatchArgs};

/// Score loan applications with a WOE logistic-regression scorecard
#[derive(Parser)]
#[command(
    name = "scorecard",
    version,
    about = "Score loan applications with a WOE credit scorecard",
    long_about = "Runs loan applications through a weight-of-evidence credit scorecard: \
                  binning, logistic regression and PDO score scaling, all in decimal \
                  arithmetic. Uses the builtin model unless --artifacts points at a \
                  bundle file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Artifact bundle JSON (defaults to the builtin model)
    #[arg(long, global = true, env = "SCORECARD_ARTIFACTS")]
    artifacts: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single application
    Predict(PredictArgs),
    /// Score a list of applications independently
    PredictBatch(PredictBatchArgs),
    /// Describe the loaded model
    ModelInfo,
    /// Rank model features by importance
    FeatureImportance(FeatureImportanceArgs),
    /// Load and cross-check an artifact bundle
    ValidateArtifacts,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let artifacts = cli.artifacts.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Predict(args) => commands::predict::run_predict(args, artifacts),
        Commands::PredictBatch(args) => commands::predict::run_predict_batch(args, artifacts),
        Commands::ModelInfo => commands::model::run_model_info(artifacts),
        Commands::FeatureImportance(args) => {
            commands::model::run_feature_importance(args, artifacts)
        }
        Commands::ValidateArtifacts => commands::model::run_validate_artifacts(artifacts),
        Commands::Version => {
            println!("scorecard {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
