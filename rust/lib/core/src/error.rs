use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::types::now_rfc3339;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

/// Stable error code constants.
///
/// Clients should match on `code` from `{"ok": false, "code": "...", "error": "..."}`.
/// Codes never change; messages may be reworded.
pub mod error_code {
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const INTERNAL: &str = "INTERNAL";
}

/// One offending key in a frame's `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub key: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

// ── ServiceError ────────────────────────────────────────────────────

/// Rejection reasons produced by the gateway.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code. Single-reason rejections render as:
///
/// ```json
/// {"ok": false, "code": "PERMISSION_DENIED", "error": "hardwareSN mismatch"}
/// ```
///
/// Field violations carry the whole list instead of a single message.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Authentication material absent or wrong. HTTP 401.
    #[error("{0}")]
    Unauthenticated(String),

    /// Identity-level rejection. HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// Content-level rejection. HTTP 400.
    #[error("{0}")]
    BadRequest(String),

    /// Frame data broke the model contract. HTTP 400.
    #[error("validation errors ({} fields)", .0.len())]
    InvalidFields(Vec<FieldViolation>),

    /// Lookup on an auxiliary endpoint found nothing. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Request body over the configured limit. HTTP 413.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Server misconfiguration. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated(_) => error_code::UNAUTHENTICATED,
            ServiceError::Forbidden(_) => error_code::PERMISSION_DENIED,
            ServiceError::BadRequest(_) => error_code::VALIDATION_FAILED,
            ServiceError::InvalidFields(_) => error_code::VALIDATION_FAILED,
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::PayloadTooLarge(_) => error_code::PAYLOAD_TOO_LARGE,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ServiceError::InvalidFields(errors) => serde_json::json!({
                "ok": false,
                "code": self.error_code(),
                "serverTime": now_rfc3339(),
                "errors": errors,
            }),
            _ => serde_json::json!({
                "ok": false,
                "code": self.error_code(),
                "error": self.to_string(),
            }),
        };
        (status, axum::Json(body)).into_response()
    }
}
