use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScorecardError {
    #[error("Invalid input: {field} — {reason}")]
    Validation { field: String, reason: String },

    #[error("Artifact error: {artifact} — {reason}")]
    Artifact { artifact: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScorecardError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScorecardError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn artifact(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        ScorecardError::Artifact {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    /// Field name for validation failures, `None` otherwise.
    pub fn field(&self) -> Option<&str> {
        match self {
            ScorecardError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
