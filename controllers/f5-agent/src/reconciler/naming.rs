//! Declaration keys and fixed AS3 attribute values
//!
//! The status and metrics pollers rebuild these same keys to address iControl
//! stats, so every name produced here must stay stable.

use andromeda_client::{DomainMode, MonitorType};

pub const COMMON_TENANT: &str = "Common";
pub const SHARED_APPLICATION: &str = "Shared";
pub const SHARED_TEMPLATE: &str = "shared";
pub const DOMAIN_APPLICATION: &str = "application";
pub const WIDEIP_KEY: &str = "wideip";

pub const SERVER_TYPE: &str = "generic-host";
pub const POOL_RECORD_TYPE: &str = "A";
pub const DOMAIN_POOL_LB_MODE: &str = "global-availability";
pub const POOL_LB_MODE_NONE: &str = "none";

/// Built-in monitor attached to servers whose pool has none
pub const DEFAULT_SERVER_MONITOR: &str = "/Common/tcp";

pub fn domain_tenant_key(domain_id: &str) -> String {
    format!("domain_{domain_id}")
}

pub fn pool_key(pool_id: &str) -> String {
    format!("pool_{pool_id}")
}

pub fn monitor_key(monitor_id: &str) -> String {
    format!("cc_andromeda_monitor_{monitor_id}")
}

pub fn server_key(member_address: &str, datacenter_name: &str) -> String {
    format!("cc_andromeda_srv_{member_address}_{datacenter_name}")
}

pub fn virtual_server_name(member_address: &str, member_port: u16) -> String {
    format!("{member_address}:{member_port}")
}

/// Absolute path of a server in the shared application
pub fn shared_server_path(server_key: &str) -> String {
    format!("/{COMMON_TENANT}/{SHARED_APPLICATION}/{server_key}")
}

/// Path of a datacenter object pre-provisioned on the device
pub fn datacenter_path(datacenter_name: &str) -> String {
    format!("/{COMMON_TENANT}/{datacenter_name}")
}

/// `GSLB_Pool.lbModePreferred` for a domain's mode
///
/// `global-availability` always answers with the first available member,
/// `round-robin` cycles through the members.
pub fn pool_member_lb_mode(mode: DomainMode) -> &'static str {
    match mode {
        DomainMode::Availability => "global-availability",
        _ => "round-robin",
    }
}

/// AS3 `monitorType` for an Andromeda monitor type
pub fn monitor_type(monitor_type: MonitorType) -> &'static str {
    match monitor_type {
        MonitorType::Http => "http",
        MonitorType::Https => "https",
        MonitorType::Icmp => "gateway-icmp",
        MonitorType::Udp => "udp",
        _ => "tcp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_deterministic() {
        assert_eq!(server_key("200.10.0.1", "dc1"), "cc_andromeda_srv_200.10.0.1_dc1");
        assert_eq!(virtual_server_name("200.10.0.1", 80), "200.10.0.1:80");
        assert_eq!(monitor_key("mon1"), "cc_andromeda_monitor_mon1");
        assert_eq!(domain_tenant_key("dom1-uuid"), "domain_dom1-uuid");
        assert_eq!(pool_key("pool1-uuid"), "pool_pool1-uuid");
        assert_eq!(
            shared_server_path("cc_andromeda_srv_200.10.0.1_dc1"),
            "/Common/Shared/cc_andromeda_srv_200.10.0.1_dc1"
        );
        assert_eq!(datacenter_path("dc1"), "/Common/dc1");
    }

    #[test]
    fn test_pool_member_lb_mode() {
        assert_eq!(pool_member_lb_mode(DomainMode::RoundRobin), "round-robin");
        assert_eq!(pool_member_lb_mode(DomainMode::Availability), "global-availability");
        assert_eq!(pool_member_lb_mode(DomainMode::Weighted), "round-robin");
        assert_eq!(pool_member_lb_mode(DomainMode::Other), "round-robin");
    }

    #[test]
    fn test_monitor_type() {
        assert_eq!(monitor_type(MonitorType::Http), "http");
        assert_eq!(monitor_type(MonitorType::Https), "https");
        assert_eq!(monitor_type(MonitorType::Icmp), "gateway-icmp");
        assert_eq!(monitor_type(MonitorType::Tcp), "tcp");
        assert_eq!(monitor_type(MonitorType::Udp), "udp");
        assert_eq!(monitor_type(MonitorType::Smtp), "tcp");
    }
}
