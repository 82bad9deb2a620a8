//! The F5 agent and its three sync cycles
//!
//! Built once at startup and shared by `Arc` with every worker and HTTP
//! handler.

use crate::config::F5Settings;
use crate::error::AgentError;
use crate::metrics::{VIRTUAL_SERVER_PICKS, collect_virtual_server_metrics};
use crate::poster::post_declaration;
use crate::publisher::{publish_member_status, publish_provisioning_status};
use crate::reconciler::{Declaration, build_declaration};
use crate::sanity::sanity_check_declaration;
use crate::status::build_member_status_updates;
use crate::store::Store;
use andromeda_client::AndromedaClientTrait;
use bigip_client::BigIpClientTrait;
use std::fmt;
use std::sync::Arc;

/// Reconciles one provider's desired state onto one BigIP device
pub struct F5Agent {
    settings: F5Settings,
    store: Arc<dyn Store>,
    rpc: Arc<dyn AndromedaClientTrait>,
    bigip: Arc<dyn BigIpClientTrait>,
}

impl fmt::Debug for F5Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("F5Agent")
            .field("settings", &self.settings)
            .field("bigip", &self.bigip.host())
            .finish_non_exhaustive()
    }
}

impl F5Agent {
    pub fn new(
        settings: F5Settings,
        store: Arc<dyn Store>,
        rpc: Arc<dyn AndromedaClientTrait>,
        bigip: Arc<dyn BigIpClientTrait>,
    ) -> Self {
        Self {
            settings,
            store,
            rpc,
            bigip,
        }
    }

    pub fn settings(&self) -> &F5Settings {
        &self.settings
    }

    /// Build, post, then publish the outcomes of one declaration
    ///
    /// Outcomes are published only after the device accepted the declaration.
    pub async fn declaration_sync(&self) -> Result<(), AgentError> {
        let Declaration { adc, updates } = build_declaration(&self.settings, self.store.as_ref()).await?;
        post_declaration(&adc, self.bigip.as_ref(), sanity_check_declaration).await?;
        publish_provisioning_status(self.rpc.as_ref(), &updates).await
    }

    /// Read member health from the device and publish it
    pub async fn status_sync(&self) -> Result<(), AgentError> {
        let updates = build_member_status_updates(self.bigip.as_ref(), self.store.as_ref()).await?;
        publish_member_status(self.rpc.as_ref(), &updates).await
    }

    /// Refresh the federated virtual server picks
    pub async fn metrics_sync(&self) -> Result<(), AgentError> {
        collect_virtual_server_metrics(self.bigip.as_ref(), self.store.as_ref(), &VIRTUAL_SERVER_PICKS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use andromeda_client::{
        DomainMode, EntityKind, MockAndromedaClient, ProvisioningStatus, ProvisioningStatusUpdate,
        RpcMethod,
    };
    use bigip_client::MockBigIpClient;
    use serde_json::json;

    fn test_agent(rpc: &MockAndromedaClient, bigip: &MockBigIpClient) -> F5Agent {
        F5Agent::new(
            F5Settings {
                domain_suffix: ".internal".to_string(),
                ..F5Settings::default()
            },
            Arc::new(create_test_store(rpc)),
            Arc::new(rpc.clone()),
            Arc::new(bigip.clone()),
        )
    }

    fn seeded_rpc() -> MockAndromedaClient {
        let rpc = MockAndromedaClient::new();
        seed_snapshot(
            &rpc,
            &[create_test_datacenter("dc1-uuid", "dc1")],
            &[create_test_domain(
                "dom1",
                "test1",
                DomainMode::RoundRobin,
                vec![create_test_pool(
                    "pool1",
                    vec![create_test_member("member1", "10.0.0.1", 80, "dc1-uuid")],
                    vec![],
                )],
            )],
        );
        rpc
    }

    #[tokio::test]
    async fn test_declaration_sync_posts_then_publishes() {
        let rpc = seeded_rpc();
        let bigip = MockBigIpClient::new("bigip-1");

        test_agent(&rpc, &bigip).declaration_sync().await.unwrap();

        let posted = bigip.posted_declarations();
        assert_eq!(posted.len(), 1);
        let declaration: serde_json::Value = serde_json::from_str(&posted[0]).unwrap();
        assert_eq!(
            declaration["domain_dom1"]["application"]["wideip"]["domainName"],
            json!("test1.internal")
        );

        let active = |id: &str, model| ProvisioningStatusUpdate::new(id, model, ProvisioningStatus::Active);
        assert_eq!(
            rpc.provisioning_batches(),
            vec![vec![
                active("member1", EntityKind::Member),
                active("pool1", EntityKind::Pool),
                active("dom1", EntityKind::Domain),
            ]]
        );
    }

    #[tokio::test]
    async fn test_failed_post_publishes_nothing() {
        let rpc = seeded_rpc();
        let bigip = MockBigIpClient::new("bigip-1");
        bigip.fail_post("declaration is invalid");

        let err = test_agent(&rpc, &bigip).declaration_sync().await.unwrap_err();

        assert!(matches!(err, AgentError::BigIp(_)));
        assert_eq!(rpc.call_count(RpcMethod::UpdateProvisioningStatus), 0);
    }

    #[tokio::test]
    async fn test_failed_build_posts_nothing() {
        let rpc = seeded_rpc();
        rpc.fail_on(RpcMethod::GetMembers, "RPC GetMembers() failed");
        let bigip = MockBigIpClient::new("bigip-1");

        let err = test_agent(&rpc, &bigip).declaration_sync().await.unwrap_err();

        assert!(err.to_string().contains("RPC GetMembers() failed"));
        assert!(bigip.posted_declarations().is_empty());
        assert_eq!(rpc.call_count(RpcMethod::UpdateProvisioningStatus), 0);
    }

    #[tokio::test]
    async fn test_next_cycle_recovers_after_store_failure() {
        let rpc = seeded_rpc();
        rpc.fail_on(RpcMethod::GetDomains, "RPC GetDomains() failed");
        let bigip = MockBigIpClient::new("bigip-1");
        let agent = test_agent(&rpc, &bigip);

        assert!(agent.declaration_sync().await.is_err());
        assert!(bigip.posted_declarations().is_empty());

        rpc.clear_failure(RpcMethod::GetDomains);
        agent.declaration_sync().await.unwrap();

        assert_eq!(bigip.posted_declarations().len(), 1);
        assert_eq!(rpc.provisioning_batches().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_publish_fails_the_cycle() {
        let rpc = seeded_rpc();
        rpc.fail_on(
            RpcMethod::UpdateProvisioningStatus,
            "RPC UpdateProvisioningStatus() failed",
        );
        let bigip = MockBigIpClient::new("bigip-1");

        let err = test_agent(&rpc, &bigip).declaration_sync().await.unwrap_err();

        assert!(err.to_string().contains("RPC UpdateProvisioningStatus() failed"));
        assert_eq!(bigip.posted_declarations().len(), 1);
    }

    #[tokio::test]
    async fn test_status_sync_publishes_one_batch() {
        let rpc = seeded_rpc();
        let bigip = MockBigIpClient::new("bigip-1");
        bigip.set_response(
            "gtm/pool/a/~domain_dom1~application~pool_pool1/members/~Common~cc_andromeda_srv_10.0.0.1_dc1:10.0.0.1:80/stats",
            json!({"entries": {"theKey": {"nestedStats": {"entries": {
                "status.availabilityState": {"description": "available"}
            }}}}}),
        );

        test_agent(&rpc, &bigip).status_sync().await.unwrap();

        let batches = rpc.member_status_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
        assert_eq!(batches[0][0].id, "member1");
        assert_eq!(batches[0][0].status, andromeda_client::MemberStatus::Online);
    }

    #[tokio::test]
    async fn test_status_sync_publish_failure() {
        let rpc = MockAndromedaClient::new();
        rpc.add_datacenter(create_test_datacenter("dc1-uuid", "dc1"));
        rpc.add_domain(create_test_domain("dom1", "test1", DomainMode::RoundRobin, vec![]));
        rpc.fail_on(RpcMethod::UpdateMemberStatus, "RPC failed for UpdateMemberStatus");
        let bigip = MockBigIpClient::new("bigip-1");

        let err = test_agent(&rpc, &bigip).status_sync().await.unwrap_err();

        assert!(err.to_string().contains("RPC failed for UpdateMemberStatus"));
        assert_eq!(rpc.call_count(RpcMethod::UpdateMemberStatus), 1);
        assert!(bigip.requested_paths().is_empty());
    }

    #[tokio::test]
    async fn test_metrics_sync_tolerates_missing_stats() {
        let rpc = seeded_rpc();
        let bigip = MockBigIpClient::new("bigip-1");

        test_agent(&rpc, &bigip).metrics_sync().await.unwrap();

        assert_eq!(
            bigip.requested_paths(),
            vec!["gtm/server/~Common~cc_andromeda_srv_10.0.0.1_dc1/stats".to_string()]
        );
    }
}
