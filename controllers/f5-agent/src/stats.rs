//! iControl REST stats payloads
//!
//! Stats endpoints answer with a collection keyed by the self link of the
//! object:
//!
//! ```json
//! {"entries": {"https://localhost/mgmt/tm/...": {"nestedStats": {"entries": {
//!     "status.availabilityState": {"description": "available"},
//!     "vsPicks": {"value": 42}
//! }}}}}
//! ```
//!
//! A single-object stats URL must yield exactly one entry.

use crate::error::AgentError;
use crate::reconciler::naming::{
    COMMON_TENANT, DOMAIN_APPLICATION, domain_tenant_key, pool_key,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Availability of a GSLB object
pub const AVAILABILITY_STATE: &str = "status.availabilityState";

/// Number of times the DNS resolver picked a virtual server of a GSLB server
pub const VS_PICKS_STAT: &str = "vsPicks";

#[derive(Debug, Default, Deserialize)]
struct StatsCollection {
    #[serde(default)]
    entries: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedStatsEntry {
    nested_stats: NestedStats,
}

/// One stat: counters carry `value`, states carry `description`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatValue {
    pub value: u64,
    pub description: String,
}

/// Stats of a single object
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NestedStats {
    pub entries: HashMap<String, StatValue>,
}

impl NestedStats {
    pub fn description(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|stat| stat.description.as_str())
    }

    pub fn value(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|stat| stat.value)
    }
}

/// Decode the stats of the single object a stats URL addresses
pub fn decode_single_nested_stats(body: serde_json::Value) -> Result<NestedStats, AgentError> {
    let collection: StatsCollection = serde_json::from_value(body)
        .map_err(|e| AgentError::Stats(format!("could not decode stats collection: {e}")))?;
    let count = collection.entries.len();
    let Some(entry) = collection.entries.into_values().next().filter(|_| count == 1) else {
        return Err(AgentError::Stats(format!(
            "expected exactly 1 key, found {count}"
        )));
    };
    let entry: NestedStatsEntry = serde_json::from_value(entry)
        .map_err(|e| AgentError::Stats(format!("could not decode nested member stats: {e}")))?;
    Ok(entry.nested_stats)
}

/// Stats path of one member of a domain pool
pub fn pool_member_stats_path(
    domain_id: &str,
    pool_id: &str,
    server_key: &str,
    virtual_server_name: &str,
) -> String {
    format!(
        "gtm/pool/a/~{}~{DOMAIN_APPLICATION}~{}/members/~{COMMON_TENANT}~{server_key}:{virtual_server_name}/stats",
        domain_tenant_key(domain_id),
        pool_key(pool_id),
    )
}

/// Stats path of a shared GSLB server
pub fn server_stats_path(server_key: &str) -> String {
    format!("gtm/server/~{COMMON_TENANT}~{server_key}/stats")
}
