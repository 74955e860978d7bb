//! Error handling for the Star Wars API
//!
//! This module provides a unified error type hierarchy using thiserror,
//! with HTTP status code mapping via Axum's IntoResponse trait and GraphQL
//! error conversion carrying a machine-readable `code` extension.

use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::graphql::loaders::LoaderError;
use crate::models::InvalidIdError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// Invalid or missing authentication credentials
    #[error("authentication required")]
    Unauthorized,

    /// Invalid token (expired, malformed, etc.)
    #[error("invalid authentication token: {0}")]
    InvalidToken(String),

    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists (unique name, username or email)
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    /// Operation refused because other rows still reference the target
    #[error("constraint violation: {0}")]
    Constraint(String),

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Identifier of the wrong shape
    #[error("{0}")]
    InvalidKey(#[from] InvalidIdError),

    // ========== Database Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Batched relationship load failed
    #[error("batch load failed: {0}")]
    Loader(#[from] LoaderError),

    // ========== Internal Errors ==========
    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),

    /// JWT encoding/decoding error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            Self::Unauthorized | Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            Self::NotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Conflict { .. } | Self::Constraint(_) => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::InvalidKey(_) => StatusCode::BAD_REQUEST,

            // 503 Service Unavailable
            Self::Database(sqlx::Error::PoolTimedOut) => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Database(_)
            | Self::Loader(_)
            | Self::Internal(_)
            | Self::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized | Self::InvalidToken(_) => "UNAUTHENTICATED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "DUPLICATE_ERROR",
            Self::Constraint(_) => "CONSTRAINT_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Loader(_) => "BATCH_LOAD_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Jwt(_) => "JWT_ERROR",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Create a conflict error for a specific resource
    pub fn conflict(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type,
            id: id.into(),
        }
    }

    /// Map a write failure, turning unique-constraint violations into conflicts
    pub fn from_write(err: sqlx::Error, resource_type: &'static str, name: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::conflict(resource_type, name)
            }
            _ => Self::Database(err),
        }
    }

    /// Whether details of this error may be shown to clients
    fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authentication error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Message safe to return to clients; server-side details stay in the logs
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "An unexpected error occurred".to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        self.log();

        let code = match self {
            Self::Database(_) | Self::Loader(_) | Self::Jwt(_) => {
                "INTERNAL_ERROR"
            }
            other => other.error_code(),
        };

        async_graphql::Error::new(self.public_message()).extend_with(|_, e| e.set("code", code))
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}
