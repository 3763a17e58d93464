//! Client error types

use thiserror::Error;

use crate::scope::ValidationError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the request
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// Local input validation failed; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
