//! Error types for the review server

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use correction_client::CorrectionError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No API key configured")]
    MissingCredential,

    #[error("Text generation service busy, retry later")]
    RetryLater { retry_after_secs: Option<u64> },

    #[error("Text generation service error: {0}")]
    Service(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::MissingCredential => (
                StatusCode::PRECONDITION_FAILED,
                "MISSING_CREDENTIAL",
                "No API key configured; set GEMINI_API_KEY or pass api_key".to_string(),
            ),
            ServerError::RetryLater { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RETRY_LATER",
                "Text generation service is busy, please retry later".to_string(),
            ),
            ServerError::Service(msg) => (StatusCode::BAD_GATEWAY, "SERVICE_ERROR", msg.clone()),
            ServerError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if let ServerError::RetryLater {
            retry_after_secs: Some(secs),
        } = self
        {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<CorrectionError> for ServerError {
    fn from(err: CorrectionError) -> Self {
        match err {
            CorrectionError::MissingCredential => ServerError::MissingCredential,
            CorrectionError::Unavailable {
                retry_after_secs, ..
            } => ServerError::RetryLater { retry_after_secs },
            CorrectionError::Service(detail) => ServerError::Service(detail),
            other @ CorrectionError::EmptyResponse => ServerError::Service(other.to_string()),
        }
    }
}
