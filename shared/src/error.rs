//! Unified error handling
//!
//! One application error enum, one central HTTP mapping. Route handlers
//! return [`AppResult`] and never build status codes by hand; the
//! [`IntoResponse`] impl is the single place where the taxonomy becomes
//! HTTP statuses and wire bodies.
//!
//! # Error codes
//!
//! | code                | HTTP | meaning                                  |
//! |---------------------|------|------------------------------------------|
//! | `VALIDATION`        | 400  | malformed or missing fields              |
//! | `NOT_AUTHENTICATED` | 400  | no resolvable user identity supplied     |
//! | `NOT_AUTHORIZED`    | 403  | identity resolved, but not the owner     |
//! | `NOT_FOUND`         | 404  | record does not exist                    |
//! | `CONFLICT`          | 409  | duplicate CPF within the same user store |
//! | `NOT_CONFIGURED`    | 503  | optional integration missing prerequisites |
//! | `NOT_IMPLEMENTED`   | 501  | reserved                                 |
//! | `DATABASE`          | 500  | storage failure                          |
//! | `INTERNAL`          | 500  | anything unclassified                    |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Wire body for every error response.
///
/// ```json
/// {
///   "code": "NOT_AUTHORIZED",
///   "message": "Registro pertence a outro usuário",
///   "details": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Request errors (4xx) ==========
    #[error("Validation failed: {0}")]
    /// Malformed/missing fields (400)
    Validation(String),

    #[error("No user identity supplied")]
    /// Request carried no resolvable identity candidate at all (400).
    /// Mapped to 400, not 401: identity is a plain header/query/body
    /// field here, not an authentication scheme.
    NotAuthenticated,

    #[error("Permission denied: {0}")]
    /// Identity resolved but does not own the record (403)
    NotAuthorized(String),

    #[error("Resource not found: {0}")]
    /// Record absent (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// Duplicate CPF within one user's store (409)
    Conflict(String),

    // ========== Integration errors ==========
    #[error("Integration not configured: {message}")]
    /// Optional external integration missing prerequisites (503).
    /// `missing` lists the absent configuration keys.
    NotConfigured {
        message: String,
        missing: Vec<String>,
    },

    #[error("Not implemented: {0}")]
    /// Reserved (501)
    NotImplemented(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    /// Storage failure (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// Unclassified (500)
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::NotAuthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn not_configured(message: impl Into<String>, missing: Vec<String>) -> Self {
        Self::NotConfigured {
            message: message.into(),
            missing,
        }
    }

    /// Stable wire code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::NotAuthorized(_) => "NOT_AUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::NotConfigured { .. } => "NOT_CONFIGURED",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::Database(_) => "DATABASE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotAuthenticated => StatusCode::BAD_REQUEST,
            Self::NotAuthorized(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (message, details) = match &self {
            AppError::Validation(msg) => (msg.clone(), None),
            AppError::NotAuthenticated => ("Informe o usuário responsável".to_string(), None),
            AppError::NotAuthorized(msg) => (msg.clone(), None),
            AppError::NotFound(msg) => (msg.clone(), None),
            AppError::Conflict(msg) => (msg.clone(), None),
            AppError::NotConfigured { message, missing } => (
                message.clone(),
                Some(serde_json::json!({ "missing": missing })),
            ),
            AppError::NotImplemented(msg) => (msg.clone(), None),
            // Storage/internal details go to the log, not to the client.
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                ("Erro interno no armazenamento".to_string(), None)
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (msg.clone(), None)
            }
        };

        let body = Json(ErrorBody {
            code: code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
