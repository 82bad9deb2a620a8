//! Andromeda client errors

use thiserror::Error;

/// Errors that can occur when talking to the Andromeda RPC service
#[derive(Debug, Error)]
pub enum AndromedaError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned an error
    #[error("Andromeda API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid or expired token)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// RPC method or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., malformed base URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
