//! Prometheus metrics for the F5 agent.
//!
//! Two groups share one registry, exposed on `GET /metrics`:
//!
//! - **Operational**: last successful sync per agent (timestamp and duration)
//! - **Federated**: resolver picks per virtual server, read from the device
//!   by the metrics agent

use crate::error::AgentError;
use crate::reconciler::naming::server_key;
use crate::reconciler::{index_datacenters, is_declared, resolve_datacenter};
use crate::stats::{VS_PICKS_STAT, decode_single_nested_stats, server_stats_path};
use crate::store::Store;
use bigip_client::BigIpClientTrait;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Completion time (unix seconds) of the last successful sync
///
/// Labels:
/// - `agent`: `declaration`, `status` or `metrics`
pub static LAST_SYNC_TIMESTAMP: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        "andromeda_agent_last_sync_timestamp",
        "Last time an agent has successfully completed its sync loop (sync completion timestamp)",
    );
    register_gauge_vec(opts, &["agent"])
});

/// Duration in seconds of the last successful sync
///
/// Labels:
/// - `agent`: `declaration`, `status` or `metrics`
pub static LAST_SYNC_DURATION_SECONDS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        "andromeda_agent_last_sync_duration_seconds",
        "Last time an agent has successfully completed its sync loop (sync duration in seconds)",
    );
    register_gauge_vec(opts, &["agent"])
});

/// Resolver picks of the virtual servers of a member's GSLB server
///
/// Labels:
/// - `domain`: domain FQDN
/// - `datacenter_id`, `project_id`: of the member
/// - `target_ip`: member address
pub static VIRTUAL_SERVER_PICKS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        "andromeda_f5_virtual_server_picks",
        "Total picks of the virtual server by the DNS resolver (derived from F5 iControlRest tm:gtm:server:serverstats endpoint)",
    );
    register_gauge_vec(opts, &["domain", "datacenter_id", "project_id", "target_ip"])
});

#[allow(clippy::expect_used, reason = "metric definitions are static")]
fn register_gauge_vec(opts: Opts, labels: &[&str]) -> GaugeVec {
    let gauge = GaugeVec::new(opts, labels).expect("valid gauge definition");
    METRICS_REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("gauge registered once");
    gauge
}

/// Record a successful sync of `agent`
pub fn record_sync_success(agent: &str, duration: Duration) {
    #[allow(clippy::cast_precision_loss, reason = "unix seconds fit in f64")]
    let now = chrono::Utc::now().timestamp() as f64;
    LAST_SYNC_TIMESTAMP.with_label_values(&[agent]).set(now);
    LAST_SYNC_DURATION_SECONDS
        .with_label_values(&[agent])
        .set(duration.as_secs_f64());
}

/// Gather all metrics as Prometheus text format
///
/// # Errors
///
/// Returns [`AgentError::Metrics`] if encoding fails.
pub fn gather_metrics() -> Result<String, AgentError> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| AgentError::Metrics(prometheus::Error::Msg(format!("UTF-8 error: {e}"))))
}

/// Read the picks of every declared member's server into `picks`
///
/// Members that cannot be resolved or whose stats cannot be read are skipped.
pub async fn collect_virtual_server_metrics(
    bigip: &dyn BigIpClientTrait,
    store: &dyn Store,
    picks: &GaugeVec,
) -> Result<(), AgentError> {
    let datacenters = index_datacenters(&store.get_datacenters().await?);
    let domains = store.get_domains().await?;

    for domain in domains.iter().filter(|d| is_declared(d.provisioning_status)) {
        for pool in domain.pools.iter().filter(|p| is_declared(p.provisioning_status)) {
            for member in pool.members.iter().filter(|m| is_declared(m.provisioning_status)) {
                let datacenter = match resolve_datacenter(&datacenters, member) {
                    Ok(datacenter) => datacenter,
                    Err(e) => {
                        warn!("{}", e);
                        continue;
                    }
                };
                let path = server_stats_path(&server_key(&member.address, &datacenter.name));
                let stats = match bigip.get(&path).await {
                    Ok(body) => decode_single_nested_stats(body),
                    Err(e) => Err(e.into()),
                };
                let value = match stats {
                    Ok(stats) => stats.value(VS_PICKS_STAT).unwrap_or_default(),
                    Err(e) => {
                        warn!(
                            "failed to determine GSLB_Server picks [BigIP URL path = {}]: {}",
                            path, e
                        );
                        continue;
                    }
                };
                #[allow(clippy::cast_precision_loss, reason = "pick counts stay far below 2^52")]
                picks
                    .with_label_values(&[
                        domain.fqdn.as_str(),
                        member.datacenter_id.as_str(),
                        member.project_id.as_str(),
                        member.address.as_str(),
                    ])
                    .set(value as f64);
            }
        }
    }
    Ok(())
}
