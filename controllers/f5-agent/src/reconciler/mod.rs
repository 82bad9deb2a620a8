//! Declaration reconciler
//!
//! Turns one desired-state snapshot into a complete AS3 declaration plus the
//! provisioning status outcomes produced while building it:
//! - `common`: the `/Common/Shared` servers and monitors, shared by all domains
//! - `domain`: one `domain_{id}` tenant per domain (wide IP and pools)
//!
//! The declaration is rebuilt from scratch on every cycle. Anything left out
//! of it is removed by the device, which is how deletions are applied.

pub mod common;
pub mod domain;
pub mod naming;


use crate::config::F5Settings;
use crate::error::AgentError;
use crate::store::Store;
use andromeda_client::{Datacenter, Member, ProvisioningStatus, ProvisioningStatusUpdate};
use as3::Adc;
use std::collections::HashMap;
use tracing::debug;

pub use common::{CommonTenant, build_common_tenant};
pub use domain::{DomainTenant, build_domain_tenant};

/// Datacenters of the snapshot by id
pub type DatacenterIndex = HashMap<String, Datacenter>;

/// Index datacenters by id
pub fn index_datacenters(datacenters: &[Datacenter]) -> DatacenterIndex {
    datacenters
        .iter()
        .map(|dc| (dc.id.clone(), dc.clone()))
        .collect()
}

/// Resolve the datacenter a member lives in
///
/// A datacenter id missing from the index, or an entry without a name, means
/// the snapshot is inconsistent: no valid server key can be built for it.
pub fn resolve_datacenter<'a>(
    datacenters: &'a DatacenterIndex,
    member: &Member,
) -> Result<&'a Datacenter, AgentError> {
    let datacenter = datacenters.get(&member.datacenter_id).ok_or_else(|| {
        AgentError::InconsistentSnapshot(format!(
            "invalid datacenter ID for member [datacenter ID = {}, member ID = {}]",
            member.datacenter_id, member.id
        ))
    })?;
    if datacenter.name.is_empty() {
        return Err(AgentError::InconsistentSnapshot(format!(
            "nil datacenter for member [datacenter ID = {}, member ID = {}]",
            member.datacenter_id, member.id
        )));
    }
    Ok(datacenter)
}

/// How an entity in a given provisioning status takes part in the declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Declared, reported `ACTIVE`
    Include,
    /// Left out of the declaration, reported `DELETED` once
    Delete,
    /// Already deleted: left out silently
    Skip,
}

impl From<ProvisioningStatus> for Inclusion {
    fn from(status: ProvisioningStatus) -> Self {
        match status {
            ProvisioningStatus::PendingDelete => Inclusion::Delete,
            ProvisioningStatus::Deleted => Inclusion::Skip,
            _ => Inclusion::Include,
        }
    }
}

/// Whether an entity in `status` still belongs in the declaration
pub fn is_declared(status: ProvisioningStatus) -> bool {
    Inclusion::from(status) == Inclusion::Include
}

/// A complete declaration and the outcomes to publish once it is applied
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub adc: Adc,
    pub updates: Vec<ProvisioningStatusUpdate>,
}

/// Build the full AS3 declaration for the current snapshot
///
/// Any store or builder error aborts the build; no partial declaration is
/// ever returned.
pub async fn build_declaration(
    settings: &F5Settings,
    store: &dyn Store,
) -> Result<Declaration, AgentError> {
    let datacenters = store.get_datacenters().await?;
    let datacenters_by_id = index_datacenters(&datacenters);
    let domains = store.get_domains().await?;

    let CommonTenant {
        tenant: common_tenant,
        updates: mut all_updates,
    } = build_common_tenant(store, &datacenters, &domains).await?;

    let mut adc = Adc::new();
    adc.add_tenant(naming::COMMON_TENANT, common_tenant);

    for domain in &domains {
        match build_domain_tenant(settings, &datacenters_by_id, domain)? {
            DomainTenant::Included { tenant, updates } => {
                all_updates.extend(updates);
                adc.add_tenant(naming::domain_tenant_key(&domain.id), tenant);
            }
            DomainTenant::Excluded { updates } => {
                debug!("Leaving domain {} out of the declaration", domain.id);
                all_updates.extend(updates);
            }
        }
    }

    debug!(
        "Built declaration with {} tenant(s) and {} status update(s)",
        adc.tenants().count(),
        all_updates.len()
    );
    Ok(Declaration {
        adc,
        updates: all_updates,
    })
}
