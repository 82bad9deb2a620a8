//! Agent error types.
//!
//! Every failure inside a sync cycle surfaces as an [`AgentError`]; the cycle
//! driver in [`crate::worker`] is the only place that logs and drops them.

use crate::sanity::SanityError;
use andromeda_client::AndromedaError;
use bigip_client::BigIpError;
use thiserror::Error;

/// Errors that can occur in the F5 agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Desired-state read failed
    #[error("Store error: {0}")]
    Store(String),

    /// Andromeda RPC error outside of a store read (status publishing)
    #[error("Andromeda error: {0}")]
    Andromeda(#[from] AndromedaError),

    /// BigIP API error
    #[error("BigIP error: {0}")]
    BigIp(#[from] BigIpError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The desired-state snapshot references something it does not contain
    #[error("Inconsistent snapshot: {0}")]
    InconsistentSnapshot(String),

    /// Two different entity kinds were assigned the same declaration key
    #[error("Entity key collision: {0}")]
    EntityKeyCollision(String),

    /// Assembled declaration failed the pre-POST structural check
    #[error("Declaration sanity check failed: {0}")]
    Sanity(#[from] SanityError),

    /// iControl stats payload could not be decoded
    #[error("Stats decoding failed: {0}")]
    Stats(String),

    /// No usable BigIP device
    #[error("Device selection failed: {0}")]
    Device(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration file error
    #[error("Configuration file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error (config file, listener)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Prometheus registry or encoding error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
