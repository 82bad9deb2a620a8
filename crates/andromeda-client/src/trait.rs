//! Trait abstraction over the Andromeda RPC client
//!
//! Lets agents run against the real service or against [`crate::mock`] in tests.

use crate::error::AndromedaError;
use crate::models::*;

#[async_trait::async_trait]
pub trait AndromedaClientTrait: Send + Sync {
    /// Search datacenters
    async fn get_datacenters(&self, request: &SearchRequest) -> Result<Vec<Datacenter>, AndromedaError>;

    /// Search domains (with pools, members and monitors when `fully_populated`)
    async fn get_domains(&self, request: &SearchRequest) -> Result<Vec<Domain>, AndromedaError>;

    /// Search members
    async fn get_members(&self, request: &SearchRequest) -> Result<Vec<Member>, AndromedaError>;

    /// Publish provisioning status outcomes in one batch
    async fn update_provisioning_status(
        &self,
        updates: &[ProvisioningStatusUpdate],
    ) -> Result<(), AndromedaError>;

    /// Publish backend-observed member health in one batch
    async fn update_member_status(&self, updates: &[MemberStatusUpdate]) -> Result<(), AndromedaError>;
}
