pub mod artifacts;
pub mod error;
pub mod scoring;
pub mod types;

pub use error::ScorecardError;
pub use scoring::{PredictionRequest, Scorecard};
pub use types::*;

/// Standard result type for all scorecard operations
pub type ScorecardResult<T> = Result<T, ScorecardError>;
