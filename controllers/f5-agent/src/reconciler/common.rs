//! `/Common/Shared` tenant builder
//!
//! Holds the entities every domain tenant points at: one GSLB server per
//! (member address, datacenter) pair and every monitor reachable through a pool.

use super::naming::{
    DEFAULT_SERVER_MONITOR, SERVER_TYPE, SHARED_APPLICATION, SHARED_TEMPLATE, datacenter_path,
    monitor_key, monitor_type, server_key, virtual_server_name,
};
use super::{Inclusion, index_datacenters, resolve_datacenter};
use crate::error::AgentError;
use crate::store::Store;
use andromeda_client::{
    Datacenter, Domain, EntityKind, Monitor, ProvisioningStatus, ProvisioningStatusUpdate,
};
use as3::{
    Application, Entity, GslbMonitor, GslbServer, GslbServerDevice, GslbVirtualServer, Pointer,
    Tenant,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// The shared tenant and the monitor/member outcomes produced while building it
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTenant {
    pub tenant: Tenant,
    pub updates: Vec<ProvisioningStatusUpdate>,
}

fn gslb_monitor(monitor: &Monitor) -> GslbMonitor {
    GslbMonitor {
        monitor_type: monitor_type(monitor.monitor_type).to_string(),
        interval: (monitor.interval > 0).then_some(monitor.interval),
        probe_timeout: (monitor.timeout > 0).then_some(monitor.timeout),
        send: monitor.send.clone(),
        receive: monitor.receive.clone(),
    }
}

/// Build the `Common` tenant
///
/// Members are fetched per datacenter; the first store error aborts the build,
/// as does a member whose datacenter is unknown or has no name.
pub async fn build_common_tenant(
    store: &dyn Store,
    datacenters: &[Datacenter],
    domains: &[Domain],
) -> Result<CommonTenant, AgentError> {
    let mut application = Application::with_template(SHARED_TEMPLATE);
    let mut updates = Vec::new();

    // Monitor pointers by pool id, attached to the servers of that pool's members
    let mut monitors_by_pool: HashMap<&str, Vec<Pointer>> = HashMap::new();
    let mut seen_monitors: HashSet<&str> = HashSet::new();

    for pool in domains.iter().flat_map(|d| d.pools.iter()) {
        let pointers = monitors_by_pool.entry(pool.id.as_str()).or_default();
        for monitor in &pool.monitors {
            let first_sighting = seen_monitors.insert(monitor.id.as_str());
            match Inclusion::from(monitor.provisioning_status) {
                Inclusion::Delete => {
                    if first_sighting {
                        updates.push(ProvisioningStatusUpdate::new(
                            &monitor.id,
                            EntityKind::Monitor,
                            ProvisioningStatus::Deleted,
                        ));
                    }
                }
                Inclusion::Skip => {}
                Inclusion::Include => {
                    let key = monitor_key(&monitor.id);
                    pointers.push(Pointer::Use(key.clone()));
                    if first_sighting {
                        application.set_entity(key, Entity::Monitor(gslb_monitor(monitor)));
                        updates.push(ProvisioningStatusUpdate::new(
                            &monitor.id,
                            EntityKind::Monitor,
                            ProvisioningStatus::Active,
                        ));
                    }
                }
            }
        }
    }

    let datacenters_by_id = index_datacenters(datacenters);
    for datacenter in datacenters {
        let members = store.get_members(&datacenter.id).await?;
        debug!(
            "Datacenter {} ({}) has {} member(s)",
            datacenter.name,
            datacenter.id,
            members.len()
        );

        for member in members {
            match Inclusion::from(member.provisioning_status) {
                Inclusion::Delete => {
                    updates.push(ProvisioningStatusUpdate::new(
                        &member.id,
                        EntityKind::Member,
                        ProvisioningStatus::Deleted,
                    ));
                    continue;
                }
                Inclusion::Skip => continue,
                Inclusion::Include => {}
            }

            let datacenter = resolve_datacenter(&datacenters_by_id, &member)?;
            let key = server_key(&member.address, &datacenter.name);
            let virtual_server = GslbVirtualServer {
                address: member.address.clone(),
                name: virtual_server_name(&member.address, member.port),
                port: member.port,
            };

            match application.entity_mut(&key) {
                None => {
                    let monitors = match monitors_by_pool.get(member.pool_id.as_str()) {
                        Some(pointers) if !pointers.is_empty() => pointers.clone(),
                        _ => vec![Pointer::Bigip(DEFAULT_SERVER_MONITOR.to_string())],
                    };
                    application.set_entity(
                        key,
                        Entity::Server(GslbServer {
                            server_type: SERVER_TYPE.to_string(),
                            data_center: Some(Pointer::Bigip(datacenter_path(&datacenter.name))),
                            devices: vec![GslbServerDevice {
                                address: member.address.clone(),
                            }],
                            virtual_servers: vec![virtual_server],
                            monitors,
                        }),
                    );
                }
                Some(Entity::Server(server)) => {
                    if server.add_virtual_server(virtual_server) {
                        debug!("Added port {} to shared server {}", member.port, key);
                    }
                }
                Some(other) => {
                    return Err(AgentError::EntityKeyCollision(format!(
                        "{key} already holds a {} entity",
                        other.class()
                    )));
                }
            }

            updates.push(ProvisioningStatusUpdate::new(
                &member.id,
                EntityKind::Member,
                ProvisioningStatus::Active,
            ));
        }
    }

    let mut tenant = Tenant::default();
    tenant.add_application(SHARED_APPLICATION, application);
    Ok(CommonTenant { tenant, updates })
}
