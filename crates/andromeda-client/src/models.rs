//! Andromeda desired-state models
//!
//! Read-only snapshot types returned by the desired-state service, plus the
//! status batches agents send back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Convergence-tracking status of a desired-state row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvisioningStatus {
    #[default]
    Active,
    PendingCreate,
    PendingUpdate,
    PendingDelete,
    Deleted,
    Error,
}

impl ProvisioningStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisioningStatus::Active => "ACTIVE",
            ProvisioningStatus::PendingCreate => "PENDING_CREATE",
            ProvisioningStatus::PendingUpdate => "PENDING_UPDATE",
            ProvisioningStatus::PendingDelete => "PENDING_DELETE",
            ProvisioningStatus::Deleted => "DELETED",
            ProvisioningStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-observed health of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Online,
    Offline,
    #[default]
    Unknown,
    NoMonitor,
}

impl MemberStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Online => "ONLINE",
            MemberStatus::Offline => "OFFLINE",
            MemberStatus::Unknown => "UNKNOWN",
            MemberStatus::NoMonitor => "NO_MONITOR",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load-balancing mode of a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainMode {
    #[default]
    RoundRobin,
    Weighted,
    Geographic,
    Availability,
    /// Any mode this client does not know about
    #[serde(other)]
    Other,
}

/// Monitor probe type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorType {
    Http,
    Https,
    Icmp,
    #[default]
    Tcp,
    Udp,
    Pop,
    Smtp,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Datacenter {
    pub id: String,
    pub name: String,
    pub admin_state_up: bool,
    pub continent: String,
    pub country: String,
    pub state_or_province: String,
    pub city: String,
    pub longitude: f64,
    pub latitude: f64,
    pub scope: String,
    pub provider: String,
    pub project_id: String,
    pub provisioning_status: ProvisioningStatus,
}

/// A domain, fully populated with its pools
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    pub id: String,
    pub admin_state_up: bool,
    pub aliases: Vec<String>,
    pub fqdn: String,
    pub mode: DomainMode,
    pub record_type: String,
    pub pools: Vec<Pool>,
    pub datacenters: Vec<Datacenter>,
    pub provisioning_status: ProvisioningStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pool {
    pub id: String,
    pub admin_state_up: bool,
    pub members: Vec<Member>,
    pub monitors: Vec<Monitor>,
    pub provisioning_status: ProvisioningStatus,
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            id: String::new(),
            admin_state_up: true,
            members: Vec::new(),
            monitors: Vec::new(),
            provisioning_status: ProvisioningStatus::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub id: String,
    pub admin_state_up: bool,
    pub address: String,
    pub port: u16,
    pub datacenter_id: String,
    pub pool_id: String,
    pub project_id: String,
    pub provisioning_status: ProvisioningStatus,
    pub status: MemberStatus,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    pub id: String,
    pub admin_state_up: bool,
    pub pool_id: String,
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    pub interval: i64,
    pub timeout: i64,
    pub send: String,
    pub receive: String,
    pub http_method: Option<String>,
    pub domain_name: Option<String>,
    pub provisioning_status: ProvisioningStatus,
}

/// Search parameters shared by the `Get*` RPC methods
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub page_number: u32,
    pub result_per_page: u32,
    pub fully_populated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<String>,
}

/// Kind of desired-state row a provisioning status update refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Domain,
    Pool,
    Member,
    Monitor,
    Datacenter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningStatusUpdate {
    pub id: String,
    pub model: EntityKind,
    pub status: ProvisioningStatus,
}

impl ProvisioningStatusUpdate {
    pub fn new(id: impl Into<String>, model: EntityKind, status: ProvisioningStatus) -> Self {
        Self {
            id: id.into(),
            model,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStatusUpdate {
    pub id: String,
    pub status: MemberStatus,
}

/// RPC methods exposed by the desired-state service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    GetDatacenters,
    GetDomains,
    GetMembers,
    UpdateProvisioningStatus,
    UpdateMemberStatus,
}

impl RpcMethod {
    /// Path segment under `/rpc/`
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::GetDatacenters => "GetDatacenters",
            RpcMethod::GetDomains => "GetDomains",
            RpcMethod::GetMembers => "GetMembers",
            RpcMethod::UpdateProvisioningStatus => "UpdateProvisioningStatus",
            RpcMethod::UpdateMemberStatus => "UpdateMemberStatus",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope of every `Get*` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    pub response: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningStatusRequest {
    pub provisioning_status: Vec<ProvisioningStatusUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberStatusRequest {
    pub member_status: Vec<MemberStatusUpdate>,
}
