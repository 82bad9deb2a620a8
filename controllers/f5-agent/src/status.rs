//! Member health read path
//!
//! Looks up the availability of every declared pool member on the device and
//! maps it to the desired-state vocabulary. Lookups that fail only shrink the
//! batch; store errors fail the cycle.

use crate::error::AgentError;
use crate::reconciler::naming::{server_key, virtual_server_name};
use crate::reconciler::{index_datacenters, is_declared, resolve_datacenter};
use crate::stats::{AVAILABILITY_STATE, decode_single_nested_stats, pool_member_stats_path};
use crate::store::Store;
use andromeda_client::{MemberStatus, MemberStatusUpdate};
use bigip_client::BigIpClientTrait;
use tracing::{debug, warn};

/// Map a BigIP availability state to a member status
pub fn map_availability(state: &str) -> MemberStatus {
    match state {
        "available" => MemberStatus::Online,
        "offline" => MemberStatus::Offline,
        _ => MemberStatus::Unknown,
    }
}

/// Collect one status update per member whose stats could be read
pub async fn build_member_status_updates(
    bigip: &dyn BigIpClientTrait,
    store: &dyn Store,
) -> Result<Vec<MemberStatusUpdate>, AgentError> {
    let datacenters = index_datacenters(&store.get_datacenters().await?);
    let domains = store.get_domains().await?;

    let mut updates = Vec::new();
    for domain in domains.iter().filter(|d| is_declared(d.provisioning_status)) {
        for pool in domain.pools.iter().filter(|p| is_declared(p.provisioning_status)) {
            for member in pool.members.iter().filter(|m| is_declared(m.provisioning_status)) {
                let datacenter = match resolve_datacenter(&datacenters, member) {
                    Ok(datacenter) => datacenter,
                    Err(e) => {
                        warn!("Skipping status of member {}: {}", member.id, e);
                        continue;
                    }
                };
                let path = pool_member_stats_path(
                    &domain.id,
                    &pool.id,
                    &server_key(&member.address, &datacenter.name),
                    &virtual_server_name(&member.address, member.port),
                );

                let body = match bigip.get(&path).await {
                    Ok(body) => body,
                    Err(e) if e.is_not_found() => {
                        debug!("No stats for member {} yet, skipping [{}]", member.id, path);
                        continue;
                    }
                    Err(e) => {
                        warn!("Failed to fetch stats of member {} [{}]: {}", member.id, path, e);
                        continue;
                    }
                };
                let stats = match decode_single_nested_stats(body) {
                    Ok(stats) => stats,
                    Err(e) => {
                        warn!("Failed to decode stats of member {} [{}]: {}", member.id, path, e);
                        continue;
                    }
                };

                let status = map_availability(stats.description(AVAILABILITY_STATE).unwrap_or_default());
                debug!("Member {} has status {}", member.id, status);
                updates.push(MemberStatusUpdate {
                    id: member.id.clone(),
                    status,
                });
            }
        }
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use andromeda_client::{DomainMode, MockAndromedaClient, RpcMethod};
    use bigip_client::MockBigIpClient;
    use serde_json::json;

    fn availability(state: &str) -> serde_json::Value {
        json!({"entries": {"theKey": {"nestedStats": {"entries": {
            "status.availabilityState": {"description": state}
        }}}}})
    }

    fn member_path(member_address: &str) -> String {
        format!(
            "gtm/pool/a/~domain_dom1-uuid~application~pool_pool1-uuid/members/~Common~cc_andromeda_srv_{member_address}_dc1-name:{member_address}:80/stats"
        )
    }

    fn seeded_mock(addresses: &[&str]) -> MockAndromedaClient {
        let members = addresses
            .iter()
            .enumerate()
            .map(|(i, address)| create_test_member(&format!("member{}", i + 1), address, 80, "dc1-uuid"))
            .collect();
        let mock = MockAndromedaClient::new();
        seed_snapshot(
            &mock,
            &[
                create_test_datacenter("dc1-uuid", "dc1-name"),
                create_test_datacenter("dc2-uuid", "dc2-name"),
            ],
            &[create_test_domain(
                "dom1-uuid",
                "test1",
                DomainMode::RoundRobin,
                vec![create_test_pool("pool1-uuid", members, vec![])],
            )],
        );
        mock
    }

    #[test]
    fn test_map_availability() {
        assert_eq!(map_availability("available"), MemberStatus::Online);
        assert_eq!(map_availability("offline"), MemberStatus::Offline);
        assert_eq!(map_availability("unknown"), MemberStatus::Unknown);
        assert_eq!(map_availability(""), MemberStatus::Unknown);
    }

    #[tokio::test]
    async fn test_store_failure_fails_the_batch() {
        let mock = MockAndromedaClient::new();
        mock.fail_on(RpcMethod::GetDatacenters, "RPC failed for datacenters");
        let bigip = MockBigIpClient::new("bigip-1");

        let err = build_member_status_updates(&bigip, &create_test_store(&mock))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("RPC failed for datacenters"));
        assert_eq!(mock.call_count(RpcMethod::GetDomains), 0);
        assert!(bigip.requested_paths().is_empty());
    }

    #[tokio::test]
    async fn test_statuses_are_mapped() {
        let mock = seeded_mock(&["10.10.0.11", "10.10.0.12", "10.10.0.13"]);
        let bigip = MockBigIpClient::new("bigip-1");
        bigip.set_response(member_path("10.10.0.11"), availability("available"));
        bigip.set_response(member_path("10.10.0.12"), availability("offline"));
        bigip.set_response(member_path("10.10.0.13"), availability("unknown"));

        let updates = build_member_status_updates(&bigip, &create_test_store(&mock))
            .await
            .unwrap();

        let status = |id: &str, status| MemberStatusUpdate {
            id: id.to_string(),
            status,
        };
        assert_eq!(
            updates,
            vec![
                status("member1", MemberStatus::Online),
                status("member2", MemberStatus::Offline),
                status("member3", MemberStatus::Unknown),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_lookups_are_skipped() {
        let mock = seeded_mock(&["10.10.0.11", "10.10.0.12", "10.10.0.13", "10.10.0.14"]);
        let bigip = MockBigIpClient::new("bigip-1");
        bigip.set_response(member_path("10.10.0.11"), availability("available"));
        // 10.10.0.12 has no stats (404)
        bigip.set_error(member_path("10.10.0.13"), "internal error");
        bigip.set_response(member_path("10.10.0.14"), json!({"entries": {}}));

        let updates = build_member_status_updates(&bigip, &create_test_store(&mock))
            .await
            .unwrap();

        assert_eq!(
            updates,
            vec![MemberStatusUpdate {
                id: "member1".to_string(),
                status: MemberStatus::Online,
            }]
        );
        assert_eq!(bigip.requested_paths().len(), 4);
    }

    #[tokio::test]
    async fn test_member_with_unknown_datacenter_is_skipped() {
        let mock = MockAndromedaClient::new();
        seed_snapshot(
            &mock,
            &[create_test_datacenter("dc1-uuid", "dc1-name")],
            &[create_test_domain(
                "dom1-uuid",
                "test1",
                DomainMode::RoundRobin,
                vec![create_test_pool(
                    "pool1-uuid",
                    vec![create_test_member("member1", "10.10.0.11", 80, "dc-missing")],
                    vec![],
                )],
            )],
        );
        let bigip = MockBigIpClient::new("bigip-1");

        let updates = build_member_status_updates(&bigip, &create_test_store(&mock))
            .await
            .unwrap();

        assert!(updates.is_empty());
        assert!(bigip.requested_paths().is_empty());
    }
}
