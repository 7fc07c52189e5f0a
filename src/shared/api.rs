//! API Envelope
//!
//! Every REST endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true,  "data": { ... } }
//! { "success": false, "message": "Post not found" }
//! ```
//!
//! The server builds it with [`ApiResponse::ok`] / [`ApiResponse::failure`];
//! the client turns it back into a plain `Result<T, ErrorInfo>` with
//! [`ApiResponse::into_result`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Failed envelope carrying a human-readable message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Convert the envelope into a `Result`
    ///
    /// `status` is the HTTP status the envelope arrived with, if known.
    pub fn into_result(self, status: Option<u16>) -> Result<T, ErrorInfo> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ErrorInfo::new(status, "Response did not include data")),
            (false, _) => Err(ErrorInfo::new(
                status,
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            )),
        }
    }
}

/// Error half of every client data-access call
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ErrorInfo {
    /// HTTP status, `None` for transport failures
    pub status: Option<u16>,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Error raised before any response was received
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

/// Result type returned by every client data-access call
pub type ApiResult<T> = Result<T, ErrorInfo>;
