//! Trait abstraction over a BigIP session

use crate::error::BigIpError;
use crate::models::{As3Response, Device};

#[async_trait::async_trait]
pub trait BigIpClientTrait: Send + Sync {
    /// Host name of the device this session talks to
    fn host(&self) -> &str;

    /// GET an iControl REST path relative to `/mgmt/tm/`
    ///
    /// A 404 is reported as [`BigIpError::NotFound`].
    async fn get(&self, path: &str) -> Result<serde_json::Value, BigIpError>;

    /// POST a serialized AS3 declaration to `/mgmt/shared/appsvcs/declare`
    async fn post_declaration(&self, declaration: String) -> Result<As3Response, BigIpError>;

    /// List the devices of the cluster (`cm/device`)
    async fn get_devices(&self) -> Result<Vec<Device>, BigIpError>;
}
