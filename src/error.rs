//! Application error type and its HTTP representation.
//!
//! Repositories, services and handlers all return [`AppError`]. At the HTTP
//! boundary it is rendered as:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::is_unique_violation_on_code;

/// Reason an API key was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid API key")]
    InvalidKey,

    #[error("API key has expired")]
    KeyExpired,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client-side input problem. Never retried.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// An explicitly requested short code is already taken.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Storage rejected an insert because the short code is already present.
    ///
    /// Callers decide whether this means "retry with another code" or
    /// "report a conflict".
    #[error("Short code already exists")]
    DuplicateCode,

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("Could not generate a unique short URL after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("Storage error: {0}")]
    Storage(sqlx::Error),

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict { .. } | AppError::DuplicateCode => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::GenerationExhausted { .. }
            | AppError::Storage(_)
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the serializable error payload.
    ///
    /// Driver messages from [`AppError::Storage`] are not exposed to clients.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => {
                ("validation_error", message.clone(), details.clone())
            }
            AppError::Unauthorized(AuthError::InvalidKey) => (
                "invalid_api_key",
                "Unauthorized access. Invalid API key.".to_string(),
                json!({}),
            ),
            AppError::Unauthorized(AuthError::KeyExpired) => (
                "api_key_expired",
                "Unauthorized access. API key has expired.".to_string(),
                json!({}),
            ),
            AppError::Conflict { message, details } => {
                ("conflict", message.clone(), details.clone())
            }
            AppError::DuplicateCode => ("conflict", self.to_string(), json!({})),
            AppError::NotFound { message, details } => {
                ("not_found", message.clone(), details.clone())
            }
            AppError::GenerationExhausted { attempts } => (
                "generation_exhausted",
                "Could not generate a unique short URL. Please try again.".to_string(),
                json!({ "attempts": attempts }),
            ),
            AppError::Storage(_) => (
                "storage_error",
                "Database error occurred.".to_string(),
                json!({}),
            ),
            AppError::Internal { message, details } => {
                ("internal_error", message.clone(), details.clone())
            }
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on_code(&e) {
            return AppError::DuplicateCode;
        }

        AppError::Storage(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
