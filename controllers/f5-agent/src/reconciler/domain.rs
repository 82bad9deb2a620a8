//! Per-domain tenant builder (`domain_{id}`: one wide IP and its pools).

use super::naming::{
    DOMAIN_APPLICATION, DOMAIN_POOL_LB_MODE, POOL_LB_MODE_NONE, POOL_RECORD_TYPE, WIDEIP_KEY,
    pool_key, pool_member_lb_mode, server_key, shared_server_path, virtual_server_name,
};
use super::{DatacenterIndex, Inclusion, is_declared, resolve_datacenter};
use crate::config::F5Settings;
use crate::error::AgentError;
use andromeda_client::{Domain, EntityKind, ProvisioningStatus, ProvisioningStatusUpdate};
use as3::{Application, Entity, GslbDomain, GslbPool, GslbPoolMember, Pointer, Tenant};

/// Result of building one domain tenant
#[derive(Debug, Clone, PartialEq)]
pub enum DomainTenant {
    /// The tenant to declare, with pool and domain outcomes
    Included {
        tenant: Tenant,
        updates: Vec<ProvisioningStatusUpdate>,
    },
    /// The domain is being deleted: its tenant must be left out of the declaration
    Excluded { updates: Vec<ProvisioningStatusUpdate> },
}

/// Build the tenant of one domain
///
/// Member outcomes are reported by the common tenant builder, not here.
pub fn build_domain_tenant(
    settings: &F5Settings,
    datacenters: &DatacenterIndex,
    domain: &Domain,
) -> Result<DomainTenant, AgentError> {
    match Inclusion::from(domain.provisioning_status) {
        Inclusion::Delete => {
            return Ok(DomainTenant::Excluded {
                updates: vec![ProvisioningStatusUpdate::new(
                    &domain.id,
                    EntityKind::Domain,
                    ProvisioningStatus::Deleted,
                )],
            });
        }
        Inclusion::Skip => return Ok(DomainTenant::Excluded { updates: Vec::new() }),
        Inclusion::Include => {}
    }

    let mut application = Application::default();
    let mut updates = Vec::new();
    let mut pool_pointers = Vec::new();

    for pool in &domain.pools {
        match Inclusion::from(pool.provisioning_status) {
            Inclusion::Delete => {
                updates.push(ProvisioningStatusUpdate::new(
                    &pool.id,
                    EntityKind::Pool,
                    ProvisioningStatus::Deleted,
                ));
                continue;
            }
            Inclusion::Skip => continue,
            Inclusion::Include => {}
        }

        updates.push(ProvisioningStatusUpdate::new(
            &pool.id,
            EntityKind::Pool,
            ProvisioningStatus::Active,
        ));
        let key = pool_key(&pool.id);
        pool_pointers.push(Pointer::Use(key.clone()));

        let mut members = Vec::with_capacity(pool.members.len());
        for member in pool.members.iter().filter(|m| is_declared(m.provisioning_status)) {
            let datacenter = resolve_datacenter(datacenters, member)?;
            members.push(GslbPoolMember {
                server: Pointer::Use(shared_server_path(&server_key(
                    &member.address,
                    &datacenter.name,
                ))),
                virtual_server: virtual_server_name(&member.address, member.port),
            });
        }

        application.set_entity(
            key,
            Entity::Pool(GslbPool {
                enabled: (!pool.admin_state_up).then_some(false),
                lb_mode_preferred: pool_member_lb_mode(domain.mode).to_string(),
                lb_mode_alternate: POOL_LB_MODE_NONE.to_string(),
                lb_mode_fallback: POOL_LB_MODE_NONE.to_string(),
                members,
                resource_record_type: POOL_RECORD_TYPE.to_string(),
            }),
        );
    }

    application.set_entity(
        WIDEIP_KEY,
        Entity::Domain(GslbDomain {
            domain_name: format!("{}{}", domain.fqdn, settings.domain_suffix),
            resource_record_type: domain.record_type.clone(),
            pool_lb_mode: DOMAIN_POOL_LB_MODE.to_string(),
            pools: pool_pointers,
        }),
    );
    updates.push(ProvisioningStatusUpdate::new(
        &domain.id,
        EntityKind::Domain,
        ProvisioningStatus::Active,
    ));

    let mut tenant = Tenant::default();
    tenant.add_application(DOMAIN_APPLICATION, application);
    Ok(DomainTenant::Included { tenant, updates })
}
