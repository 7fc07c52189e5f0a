/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Taxonomy
 *
 * | Variant            | HTTP status |
 * |--------------------|-------------|
 * | `Validation`       | 400         |
 * | `InvalidOperation` | 400         |
 * | `Auth`             | 401         |
 * | `Forbidden`        | 403         |
 * | `NotFound`         | 404         |
 * | `Conflict`         | 409         |
 * | `Database`         | 500         |
 * | `Internal`         | 500         |
 * | `Serialization`    | 500         |
 *
 * Server-side failures (500) never leak their cause to the caller; the cause
 * is logged and a generic message is returned instead.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// This enum represents all possible errors that can occur in the backend.
/// Each variant can be converted to an HTTP response.
///
/// # Usage
///
/// ```rust
/// use devconnect::backend::error::BackendError;
///
/// let err = BackendError::not_found("Post not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed or missing request data
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Request is well-formed but not allowed in the current state
    /// (self-follow, liking twice, chatting with oneself)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Bad credentials or missing/invalid token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Acting on a resource the caller does not own or participate in
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Target entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other server-side failure (hashing, token signing, ...)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the caller
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::InvalidOperation(message)
            | Self::Auth(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message) => message.clone(),
            Self::Database(_) | Self::Internal(_) | Self::Serialization(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::Validation { field, message } => Self::Validation { field, message },
            SharedError::Serialization { message } => Self::Internal(message),
        }
    }
}

/// Result alias used by the store and domain services
pub type BackendResult<T> = Result<T, BackendError>;
