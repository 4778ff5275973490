use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AttemptError;

/// Handler-level error wrapper: the closed attempt taxonomy plus the few
/// conditions only the HTTP layer can produce. `Internal` is reserved for
/// genuine bugs, not expected control flow.
#[derive(Debug)]
pub enum AppError {
    Attempt(AttemptError),
    Unauthorized,
    Internal(&'static str),
}

impl From<AttemptError> for AppError {
    fn from(err: AttemptError) -> Self {
        AppError::Attempt(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Attempt(err) => {
                let (status, code) = match err {
                    AttemptError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    AttemptError::AlreadyOpen => (StatusCode::CONFLICT, "ALREADY_OPEN"),
                    AttemptError::MaxAttemptsExceeded { .. } => {
                        (StatusCode::FORBIDDEN, "MAX_ATTEMPTS_EXCEEDED")
                    }
                    AttemptError::NoActiveSession => (StatusCode::CONFLICT, "NO_ACTIVE_SESSION"),
                    AttemptError::Persistence(_) => {
                        tracing::error!("persistence failure: {err}");
                        (StatusCode::SERVICE_UNAVAILABLE, "PERSISTENCE_FAILURE")
                    }
                };
                (status, code, err.to_string())
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "missing or invalid user identity".to_string(),
            ),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    (*msg).to_string(),
                )
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
