//! BigIP response models

use serde::{Deserialize, Serialize};

/// One device of a BigIP cluster (`tm:cm:device:devicestate`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub name: String,
    pub hostname: String,
    pub failover_state: String,
    pub active_modules: Vec<String>,
    pub marketing_name: String,
    pub version: String,
    pub management_ip: String,
}

impl Device {
    /// Whether this device is the active member of its failover pair
    pub fn is_active(&self) -> bool {
        self.failover_state == "active"
    }
}

/// `cm/device` collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceCollection {
    #[serde(default)]
    pub items: Vec<Device>,
}

/// Per-tenant result of an AS3 declare call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct As3Result {
    pub code: i64,
    pub message: String,
    pub host: String,
    pub tenant: String,
    pub run_time: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct As3Response {
    pub results: Vec<As3Result>,
}

/// Body AS3 returns when a declaration is refused
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct As3ErrorResponse {
    pub errors: Vec<String>,
    pub message: Option<String>,
    pub results: Vec<As3Result>,
}

impl As3ErrorResponse {
    /// Flatten every reported issue into one list
    pub(crate) fn issues(self) -> Vec<String> {
        let mut issues = self.errors;
        issues.extend(
            self.results
                .into_iter()
                .filter(|r| r.code >= 400)
                .map(|r| format!("tenant {}: {}", r.tenant, r.message)),
        );
        if issues.is_empty() {
            issues.extend(self.message);
        }
        issues
    }
}
