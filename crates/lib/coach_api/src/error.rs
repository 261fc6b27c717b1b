//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coach_core::relay::RelayError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// JSON error body: `{ "error": ..., "details"?: ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Server misconfigured: {0}")]
    Misconfigured(String),

    /// The upstream API refused the call; `details` is its raw payload.
    #[error("Upstream error: {message}")]
    Upstream { message: String, details: Value },

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Misconfigured(_) | AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Status and body sent to the caller. `Internal` causes never leave the process.
    fn into_parts(self) -> (StatusCode, ErrorResponse) {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(m) | AppError::Misconfigured(m) => ErrorResponse {
                error: m,
                details: None,
            },
            AppError::PayloadTooLarge => ErrorResponse {
                error: "Request body too large".to_string(),
                details: None,
            },
            AppError::Upstream { message, details } => ErrorResponse {
                error: message,
                details: Some(details),
            },
            AppError::Internal(_) => ErrorResponse {
                error: "Unexpected error".to_string(),
                details: None,
            },
        };
        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        (status, Json(body)).into_response()
    }
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        let message = e.to_string();
        match e {
            RelayError::MissingMessage => AppError::BadRequest(message),
            RelayError::Misconfigured => AppError::Misconfigured(message),
            RelayError::SessionCreationFailed { details }
            | RelayError::MessageFailed { details } => AppError::Upstream { message, details },
            RelayError::Internal(detail) => AppError::Internal(detail),
        }
    }
}
