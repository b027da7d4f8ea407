use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for its request: there are no retries, the
/// client must resubmit.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing multipart field 'resume'")]
    MissingDocument,

    #[error("malformed multipart body: {0}")]
    Multipart(String),

    #[error("storage error: {0}")]
    Storage(#[source] std::io::Error),

    #[error("failed to launch analysis engine: {0}")]
    EngineLaunch(#[source] std::io::Error),

    #[error("analysis engine failed: {0}")]
    EngineFailure(String),

    #[error("unparseable engine output: {0}")]
    OutputParse(String),

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Uniform wire envelope for every non-success response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    details: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::MissingDocument => (
                StatusCode::BAD_REQUEST,
                "No resume file provided",
                "multipart field 'resume' is required".to_string(),
            ),
            AppError::Multipart(msg) => (StatusCode::BAD_REQUEST, "Invalid upload", msg.clone()),
            AppError::Storage(e) => {
                tracing::error!("upload storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store upload",
                    e.to_string(),
                )
            }
            AppError::EngineLaunch(e) => {
                tracing::error!("analysis engine launch error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Analysis failed",
                    e.to_string(),
                )
            }
            AppError::EngineFailure(msg) => {
                tracing::error!("analysis engine failure: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Analysis failed",
                    msg.clone(),
                )
            }
            AppError::OutputParse(msg) => {
                tracing::error!("analysis engine output parse error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Analysis failed",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                    e.to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            error: message.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn parse_failure_uses_fixed_message_and_carries_detail() {
        let response =
            AppError::OutputParse("EOF while parsing an object at line 1".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Analysis failed");
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("EOF while parsing"));
    }

    #[tokio::test]
    async fn missing_document_is_a_client_error() {
        let response = AppError::MissingDocument.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "No resume file provided");
    }
}
