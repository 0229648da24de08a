//! Unified error types for the lereddit API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `SessionError`: Session store (Redis) errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP and GraphQL responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Session store errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Application layer errors - used by HTTP handlers and GraphQL resolvers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("not authenticated")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable code, used as the GraphQL `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::NotFound(_)) | AppError::NotFound(_) => "NOT_FOUND",
            AppError::Domain(DomainError::AlreadyExists(_)) => "ALREADY_EXISTS",
            AppError::Domain(DomainError::Validation(_)) | AppError::BadRequest(_) => {
                "BAD_USER_INPUT"
            }
            AppError::Domain(DomainError::Unauthorized(_)) | AppError::Unauthorized => {
                "UNAUTHENTICATED"
            }
            AppError::Domain(DomainError::Database(_)) => "DATABASE_ERROR",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Domain(DomainError::Internal(_)) | AppError::Internal(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }

    /// Message safe to show to a client. Store and internal failures are
    /// logged here and replaced by a generic message.
    fn public_message(&self) -> (&'static str, Option<String>) {
        match self {
            AppError::Domain(DomainError::NotFound(msg)) => ("Not found", Some(msg.clone())),
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                ("Already exists", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => {
                ("Validation error", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Unauthorized(msg)) => {
                ("Unauthorized", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                ("Internal server error", None)
            }
            AppError::Domain(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error", None)
            }
            AppError::Session(e) => {
                tracing::error!("Session error: {}", e);
                ("Session store error", None)
            }
            AppError::BadRequest(msg) => ("Bad request", Some(msg.clone())),
            AppError::Unauthorized => ("not authenticated", None),
            AppError::NotFound(msg) => ("Not found", Some(msg.clone())),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(DomainError::NotFound(_)) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Domain(DomainError::AlreadyExists(_)) => StatusCode::CONFLICT,
            AppError::Domain(DomainError::Validation(_)) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Domain(DomainError::Unauthorized(_)) | AppError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Domain(DomainError::Database(_))
            | AppError::Domain(DomainError::Internal(_))
            | AppError::Session(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = self.public_message();

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl async_graphql::ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        let message = match self.public_message() {
            (_, Some(details)) => details,
            (error, None) => error.to_string(),
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}
