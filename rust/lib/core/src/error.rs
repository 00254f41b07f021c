use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

/// Stable error code constants.
///
/// Every error body looks like `{"code": "NOT_FOUND", "message": "..."}`.
/// Codes never change; messages may be reworded.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_ID: &str = "INVALID_ID";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const ALREADY_REACTED: &str = "ALREADY_REACTED";
    pub const FORBIDDEN_ORIGIN: &str = "FORBIDDEN_ORIGIN";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// HTTP-facing error type shared by the server and its modules.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code. The `Display` text is exactly what the client sees
/// as `message`, so internal details must never be put in here; log them
/// where the error is produced instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Identifier is not well-formed. HTTP 400.
    #[error("{0}")]
    InvalidId(String),

    /// Input data is invalid. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// The caller already reacted this way. HTTP 400.
    #[error("{0}")]
    AlreadyReacted(String),

    /// Cross-origin request from an origin not on the allow-list. HTTP 403.
    #[error("{0}")]
    ForbiddenOrigin(String),

    /// Caller exceeded the request budget. HTTP 429.
    #[error("{0}")]
    RateLimited(String),

    /// Storage or unexpected failure. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::InvalidId(_) => error_code::INVALID_ID,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::AlreadyReacted(_) => error_code::ALREADY_REACTED,
            ServiceError::ForbiddenOrigin(_) => error_code::FORBIDDEN_ORIGIN,
            ServiceError::RateLimited(_) => error_code::RATE_LIMITED,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::AlreadyReacted(_) => StatusCode::BAD_REQUEST,
            ServiceError::ForbiddenOrigin(_) => StatusCode::FORBIDDEN,
            ServiceError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
