use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::corpus::CorpusError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resume bytes that cannot be turned into text.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Job corpus is empty; no job can be ranked")]
    EmptyCorpus,

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "MALFORMED_INPUT"),
            AppError::UnsupportedFileType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FILE_TYPE")
            }
            AppError::EmptyCorpus => (StatusCode::SERVICE_UNAVAILABLE, "EMPTY_CORPUS"),
            AppError::Corpus(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CORPUS_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Validation(msg) | AppError::MalformedInput(msg) => msg.clone(),
            AppError::UnsupportedFileType(name) => format!(
                "'{name}' is not a supported resume format. Upload a .txt or .pdf file."
            ),
            AppError::EmptyCorpus => {
                "No job postings are loaded, so no match can be computed".to_string()
            }
            AppError::Corpus(e) => {
                tracing::error!("Corpus error: {e}");
                "The job corpus could not be loaded".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            AppError::Validation("x".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
        assert_eq!(
            AppError::MalformedInput("x".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "MALFORMED_INPUT")
        );
        assert_eq!(
            AppError::UnsupportedFileType("cv.docx".into())
                .status_and_code()
                .0,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_empty_corpus_is_service_unavailable() {
        let response = AppError::EmptyCorpus.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("secret path /etc")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
