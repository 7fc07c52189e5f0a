//! Shared Error Types
//!
//! Failures that both sides of the wire can produce: a frame or body that
//! does not decode, and a request payload that breaks a field rule. The
//! backend maps `Validation` to a 400 envelope; the client surfaces the
//! message before a request is ever sent.
//!
//! ```rust
//! use devconnect::shared::error::SharedError;
//!
//! let error = SharedError::validation("password", "Password must be at least 6 characters");
//! assert_eq!(error.field(), Some("password"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A JSON body or socket frame could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A payload field broke a validation rule
    #[error("{message}")]
    Validation { field: String, message: String },
}

impl SharedError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field of a validation failure
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::Serialization { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
