//! Error types for the ESG Lens server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use esg_lens::document::PipelineError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("File too large. Maximum size is {0}MB.")]
    PayloadTooLarge(usize),

    #[error("No text found in the PDF")]
    NoContent,

    #[error("Error processing PDF: {0}")]
    Processing(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoExtractableContent => AppError::NoContent,
            other => AppError::Processing(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) | AppError::NoContent => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Processing(msg) => {
                tracing::error!("Error processing PDF: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(_) | AppError::Io(_) => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_lens::document::Stage;

    #[test]
    fn test_pipeline_errors_map_to_messages() {
        let no_text: AppError = PipelineError::NoExtractableContent.into();
        assert_eq!(no_text.to_string(), "No text found in the PDF");
        assert_eq!(no_text.into_response().status(), StatusCode::BAD_REQUEST);

        let failed: AppError = PipelineError::provider(Stage::Ocr, "tesseract missing").into();
        assert_eq!(
            failed.to_string(),
            "Error processing PDF: ocr stage failed: tesseract missing"
        );
        assert_eq!(failed.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_too_large_message() {
        let err = AppError::PayloadTooLarge(50);
        assert_eq!(err.to_string(), "File too large. Maximum size is 50MB.");
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
