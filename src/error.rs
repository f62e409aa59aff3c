// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why an identity operation failed.
///
/// Messages are user-facing. Unknown email and wrong password share one
/// variant so the response never reveals which it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address is already registered")]
    EmailInUse,

    #[error("Password is too weak")]
    WeakPassword,

    #[error("Email address is invalid")]
    InvalidEmail,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Identity service error: {0}")]
    Service(String),
}

impl AuthFailure {
    /// Map an Identity Toolkit error message (e.g. "EMAIL_EXISTS",
    /// "WEAK_PASSWORD : Password should be at least 6 characters").
    pub fn from_identity_message(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or(message).trim();
        match code {
            "EMAIL_EXISTS" => AuthFailure::EmailInUse,
            "WEAK_PASSWORD" => AuthFailure::WeakPassword,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthFailure::InvalidEmail,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "MISSING_PASSWORD" | "USER_DISABLED" => AuthFailure::InvalidCredentials,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => AuthFailure::NotSignedIn,
            other => AuthFailure::Service(other.to_string()),
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Auth(#[from] AuthFailure),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Auth(failure) => {
                let status = match failure {
                    AuthFailure::InvalidCredentials | AuthFailure::NotSignedIn => {
                        StatusCode::UNAUTHORIZED
                    }
                    AuthFailure::EmailInUse => StatusCode::CONFLICT,
                    AuthFailure::WeakPassword | AuthFailure::InvalidEmail => {
                        StatusCode::BAD_REQUEST
                    }
                    AuthFailure::Service(msg) => {
                        tracing::error!(error = %msg, "Identity service error");
                        StatusCode::BAD_GATEWAY
                    }
                };
                // Service details stay in the log.
                let details = match failure {
                    AuthFailure::Service(_) => None,
                    other => Some(other.to_string()),
                };
                (status, "auth_error", details)
            }
            AppError::Read(msg) => {
                tracing::error!(error = %msg, "Read error");
                (StatusCode::INTERNAL_SERVER_ERROR, "read_error", None)
            }
            AppError::Write(msg) => {
                tracing::error!(error = %msg, "Write error");
                (StatusCode::INTERNAL_SERVER_ERROR, "write_error", None)
            }
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream service error");
                (StatusCode::BAD_GATEWAY, "upstream_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
