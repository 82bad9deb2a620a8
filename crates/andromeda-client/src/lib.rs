//! Andromeda RPC Client
//!
//! Client library for the Andromeda desired-state service consumed by GSLB
//! agents. Provides the snapshot models (datacenters, domains, pools, members,
//! monitors) and the status write-back calls.
//!
//! # Example
//!
//! ```no_run
//! use andromeda_client::{AndromedaClient, AndromedaClientTrait, SearchRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AndromedaClient::new("http://andromeda:8080".to_string(), None)?;
//! let domains = client
//!     .get_domains(&SearchRequest {
//!         provider: Some("f5".to_string()),
//!         result_per_page: 1000,
//!         fully_populated: true,
//!         ..SearchRequest::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod andromeda_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use andromeda_trait::AndromedaClientTrait;
pub use client::AndromedaClient;
pub use error::AndromedaError;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::{MockAndromedaClient, RecordedCall};
