//! Status write-back toward the desired-state service.

use crate::error::AgentError;
use andromeda_client::{AndromedaClientTrait, MemberStatusUpdate, ProvisioningStatusUpdate};
use tracing::info;

/// Send one cycle's provisioning outcomes in a single batch
///
/// Only called once the declaration has been applied. A failure fails the
/// cycle; the next cycle recomputes and resends the same outcomes.
pub async fn publish_provisioning_status(
    client: &dyn AndromedaClientTrait,
    updates: &[ProvisioningStatusUpdate],
) -> Result<(), AgentError> {
    client.update_provisioning_status(updates).await?;
    info!("Published {} provisioning status update(s)", updates.len());
    Ok(())
}

/// Send the observed member health in a single batch
pub async fn publish_member_status(
    client: &dyn AndromedaClientTrait,
    updates: &[MemberStatusUpdate],
) -> Result<(), AgentError> {
    client.update_member_status(updates).await?;
    info!("Refreshed status of {} member(s)", updates.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use andromeda_client::{
        EntityKind, MemberStatus, MockAndromedaClient, ProvisioningStatus, RpcMethod,
    };

    #[tokio::test]
    async fn test_provisioning_batch_sent_once() {
        let client = MockAndromedaClient::new();
        let updates = vec![
            ProvisioningStatusUpdate::new("member1", EntityKind::Member, ProvisioningStatus::Active),
            ProvisioningStatusUpdate::new("dom1", EntityKind::Domain, ProvisioningStatus::Deleted),
        ];

        publish_provisioning_status(&client, &updates).await.unwrap();

        assert_eq!(client.provisioning_batches(), vec![updates]);
    }

    #[tokio::test]
    async fn test_provisioning_failure_is_reported() {
        let client = MockAndromedaClient::new();
        client.fail_on(
            RpcMethod::UpdateProvisioningStatus,
            "RPC UpdateProvisioningStatus() failed",
        );

        let err = publish_provisioning_status(&client, &[]).await.unwrap_err();

        assert!(matches!(err, AgentError::Andromeda(_)));
        assert!(err.to_string().contains("RPC UpdateProvisioningStatus() failed"));
    }

    #[tokio::test]
    async fn test_member_status_batch_sent_once() {
        let client = MockAndromedaClient::new();
        let updates = vec![MemberStatusUpdate {
            id: "member1".to_string(),
            status: MemberStatus::Online,
        }];

        publish_member_status(&client, &updates).await.unwrap();

        assert_eq!(client.member_status_batches(), vec![updates]);
        assert_eq!(client.call_count(RpcMethod::UpdateMemberStatus), 1);
    }
}
