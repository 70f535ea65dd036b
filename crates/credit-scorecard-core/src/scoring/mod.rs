pub mod linear;
pub mod pipeline;
pub mod preprocessor;
pub mod request;
pub mod transformer;

pub use linear::LinearScore;
pub use pipeline::{
    batch_items, BatchItem, BatchPrediction, FeatureImportance, ImportanceMethod, ModelInfo,
    PredictionResult, ScoreOutcome, Scorecard,
};
pub use preprocessor::EncodedFeatures;
pub use request::{PredictionRequest, RequestSchema};
pub use transformer::ScoreTransform;
