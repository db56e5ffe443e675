//! API errors and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use llm_inference_tasks::TaskError;
use rootcause::Report;
use serde::Serialize;
use std::fmt;

/// Error body: `{"error": "..."}`.
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request was malformed. The message is shown to the caller.
    Validation(String),
    /// A task failed. Only the fixed message is shown; the cause is logged.
    Internal(&'static str),
}

impl ApiError {
    /// Logs a task failure and returns the user-safe error for it.
    pub fn task_failed(message: &'static str, report: &Report<TaskError>) -> Self {
        tracing::error!(error = %report, "{}", message);
        Self::Internal(message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid request: {message}"),
            Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.to_string()),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
