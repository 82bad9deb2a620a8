//! GSLB entities placed inside AS3 applications
//!
//! Each entity kind is a variant of [`Entity`], tagged by its AS3 `class`.
//! Empty optional attributes are omitted so the device applies its defaults.

use serde::Serialize;

/// Reference to another AS3 object
///
/// `Use` points at an object declared in the same document (a local key or
/// an absolute `/Tenant/Application/key` path). `Bigip` points at an object
/// that already exists on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pointer {
    Use(String),
    Bigip(String),
}

/// A keyed AS3 entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "class")]
pub enum Entity {
    #[serde(rename = "GSLB_Server")]
    Server(GslbServer),
    #[serde(rename = "GSLB_Monitor")]
    Monitor(GslbMonitor),
    #[serde(rename = "GSLB_Pool")]
    Pool(GslbPool),
    #[serde(rename = "GSLB_Domain")]
    Domain(GslbDomain),
}

impl Entity {
    /// AS3 class name of this entity
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Entity::Server(_) => "GSLB_Server",
            Entity::Monitor(_) => "GSLB_Monitor",
            Entity::Pool(_) => "GSLB_Pool",
            Entity::Domain(_) => "GSLB_Domain",
        }
    }
}

/// GSLB server: one physical address in one datacenter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GslbServer {
    pub server_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_center: Option<Pointer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<GslbServerDevice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub virtual_servers: Vec<GslbVirtualServer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub monitors: Vec<Pointer>,
}

impl GslbServer {
    /// Append a virtual server unless one with the same port is already present.
    ///
    /// Returns `true` if the virtual server was added.
    pub fn add_virtual_server(&mut self, virtual_server: GslbVirtualServer) -> bool {
        if self
            .virtual_servers
            .iter()
            .any(|existing| existing.port == virtual_server.port)
        {
            return false;
        }
        self.virtual_servers.push(virtual_server);
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GslbServerDevice {
    pub address: String,
}

/// Virtual server (address and port) exposed by a GSLB server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GslbVirtualServer {
    pub address: String,
    pub name: String,
    pub port: u16,
}

/// Health monitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GslbMonitor {
    pub monitor_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_timeout: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub send: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub receive: String,
}

/// GSLB pool of virtual servers answering for a wide IP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GslbPool {
    /// `None` leaves the device default (enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lb_mode_preferred: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lb_mode_alternate: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lb_mode_fallback: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<GslbPoolMember>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_record_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GslbPoolMember {
    pub server: Pointer,
    pub virtual_server: String,
}

/// Wide IP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GslbDomain {
    pub domain_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_record_type: String,
    pub pool_lb_mode: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pools: Vec<Pointer>,
}
