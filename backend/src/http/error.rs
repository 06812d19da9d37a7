//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::SkyError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Engine error
    Sky(SkyError),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Sky(err) => {
                let msg = err.to_string();
                match err {
                    SkyError::AddressNotFound { attempts, .. } => {
                        let tried = attempts.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                        let body = ApiError::new("ADDRESS_NOT_FOUND", msg);
                        let body = if tried.is_empty() { body } else { body.with_details(tried) };
                        (StatusCode::UNPROCESSABLE_ENTITY, body)
                    }
                    SkyError::TimezoneResolution { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        ApiError::new("TIMEZONE_NOT_FOUND", msg),
                    ),
                    SkyError::InvalidLocalTime { .. } => {
                        (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
                    }
                    other => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new(other.code(), msg),
                    ),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        (status, Json(error)).into_response()
    }
}

impl From<SkyError> for AppError {
    fn from(err: SkyError) -> Self {
        AppError::Sky(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
