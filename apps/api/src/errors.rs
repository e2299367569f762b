use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::render::RenderError;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: name, email, skills.";
pub const GENERATION_FAILED_MESSAGE: &str = "Resume generation failed";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Error downloading file";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Bodies are plain text; details stay in the logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required field")]
    MissingRequiredField,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Delivery error: {0}")]
    Delivery(std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingRequiredField => (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE),
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected request body: {msg}");
                (StatusCode::BAD_REQUEST, "Invalid request body")
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE)
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE)
            }
            AppError::Delivery(e) => {
                tracing::error!("Download error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, DOWNLOAD_FAILED_MESSAGE)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE)
            }
        };

        (status, message).into_response()
    }
}
