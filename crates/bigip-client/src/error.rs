//! BigIP client errors

use thiserror::Error;

/// Errors that can occur when talking to a BigIP device
#[derive(Debug, Error)]
pub enum BigIpError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// iControl REST returned a non-success status
    #[error("BigIP API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// The requested object or stats path does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// AS3 refused the posted declaration
    #[error("AS3 declaration rejected ({status}): {} issue(s)", issues.len())]
    DeclarationRejected { status: u16, issues: Vec<String> },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Device URL could not be parsed
    #[error("Invalid device URL: {0}")]
    InvalidUrl(String),

    /// Credentials rejected or missing
    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl BigIpError {
    /// Whether this error means the addressed object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, BigIpError::NotFound(_))
    }
}
