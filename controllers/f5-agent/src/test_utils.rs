//! Test utilities for the reconciler, pollers and agent
//!
//! Builders for desired-state fixtures and a store wired to the mock RPC client.

use crate::store::RpcStore;
use andromeda_client::{
    Datacenter, Domain, DomainMode, Member, MockAndromedaClient, Monitor, MonitorType, Pool,
};
use std::sync::Arc;

pub fn create_test_datacenter(id: &str, name: &str) -> Datacenter {
    Datacenter {
        id: id.to_string(),
        name: name.to_string(),
        provider: "f5".to_string(),
        ..Datacenter::default()
    }
}

pub fn create_test_member(id: &str, address: &str, port: u16, datacenter_id: &str) -> Member {
    Member {
        id: id.to_string(),
        admin_state_up: true,
        address: address.to_string(),
        port,
        datacenter_id: datacenter_id.to_string(),
        project_id: "project-1".to_string(),
        ..Member::default()
    }
}

pub fn create_test_monitor(id: &str, monitor_type: MonitorType) -> Monitor {
    Monitor {
        id: id.to_string(),
        admin_state_up: true,
        monitor_type,
        interval: 10,
        timeout: 5,
        ..Monitor::default()
    }
}

/// Pool owning `members`; their `pool_id` is set to `id`
pub fn create_test_pool(id: &str, members: Vec<Member>, monitors: Vec<Monitor>) -> Pool {
    Pool {
        id: id.to_string(),
        members: members
            .into_iter()
            .map(|m| Member {
                pool_id: id.to_string(),
                ..m
            })
            .collect(),
        monitors: monitors
            .into_iter()
            .map(|m| Monitor {
                pool_id: id.to_string(),
                ..m
            })
            .collect(),
        ..Pool::default()
    }
}

pub fn create_test_domain(id: &str, fqdn: &str, mode: DomainMode, pools: Vec<Pool>) -> Domain {
    Domain {
        id: id.to_string(),
        admin_state_up: true,
        fqdn: fqdn.to_string(),
        mode,
        record_type: "A".to_string(),
        pools,
        ..Domain::default()
    }
}

/// Seed the mock with a snapshot: datacenters, domains, and every pool member
/// (so `get_members` sees the same members the domains reference)
pub fn seed_snapshot(mock: &MockAndromedaClient, datacenters: &[Datacenter], domains: &[Domain]) {
    for datacenter in datacenters {
        mock.add_datacenter(datacenter.clone());
    }
    for domain in domains {
        for member in domain.pools.iter().flat_map(|p| p.members.iter()) {
            mock.add_member(member.clone());
        }
        mock.add_domain(domain.clone());
    }
}

pub fn create_test_store(mock: &MockAndromedaClient) -> RpcStore {
    RpcStore::new(Arc::new(mock.clone()))
}
