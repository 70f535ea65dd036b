//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use credit_scorecard_core::ScorecardError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Request field failed validation.
    Validation { field: String, message: String },

    /// Body could not be decoded.
    BadRequest { status: StatusCode, message: String },

    /// Scoring invariant violated. `detail` is only exposed in debug mode.
    Internal { detail: Option<String> },
}

impl AppError {
    /// Map a core error; `debug` controls whether internal detail is exposed.
    pub fn from_scorecard(err: ScorecardError, debug: bool) -> Self {
        match err {
            ScorecardError::Validation { field, reason } => AppError::Validation {
                field,
                message: reason,
            },
            other => {
                tracing::error!("Prediction failed: {}", other);
                AppError::Internal {
                    detail: debug.then(|| other.to_string()),
                }
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mut body) = match self {
            AppError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "Validation failed",
                    "detail": message,
                    "field": field,
                }),
            ),
            AppError::BadRequest { status, message } => (
                status,
                json!({
                    "error": "Invalid request body",
                    "detail": message,
                }),
            ),
            AppError::Internal { detail } => {
                let mut body = json!({ "error": "Internal server error" });
                if let Some(detail) = detail {
                    body["detail"] = json!(detail);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        body["status"] = json!(status.as_u16());
        (status, Json(body)).into_response()
    }
}
