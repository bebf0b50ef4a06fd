use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders the same failure envelope, `{"error": "<message>"}`;
/// only the status code differs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Document format error: {0}")]
    DocumentFormat(String),

    #[error("Scoring service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Scoring service quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Scoring service error: {0}")]
    ServiceResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::DocumentFormat(_)
            | AppError::ServiceUnavailable(_)
            | AppError::QuotaExceeded(_)
            | AppError::ServiceResponse(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Worker(e) => AppError::Internal(e),
            other => AppError::DocumentFormat(other.to_string()),
        }
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            ScoringError::QuotaExceeded(msg) => AppError::QuotaExceeded(msg),
            ScoringError::Response(msg) => AppError::ServiceResponse(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            match &self {
                AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
                other => tracing::error!("Request failed: {other}"),
            }
        } else {
            tracing::warn!("Rejected request: {self}");
        }

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
