//! Andromeda F5 Agent
//!
//! Reconciles the F5 provider's desired GSLB state onto a BigIP device:
//! - Declaration agent: builds one AS3 declaration per cycle, posts it and
//!   publishes the provisioning outcome of every entity
//! - Status agent: reads pool member availability from the device and
//!   publishes it back
//! - Metrics agent: exports resolver picks per virtual server
//!
//! An admin HTTP server exposes `POST /sync`, `GET /metrics` and `GET /healthz`.

mod agent;
mod backoff;
mod config;
mod device;
mod error;
mod metrics;
mod poster;
mod publisher;
mod reconciler;
mod sanity;
mod server;
mod stats;
mod status;
mod store;
mod worker;

#[cfg(test)]
mod test_utils;

use crate::agent::F5Agent;
use crate::backoff::{ExponentialBackoff, retry};
use crate::config::{AgentConfig, LogFormat, LogSettings};
use crate::device::{ensure_dns_module, select_active_device};
use crate::error::AgentError;
use crate::server::AdminState;
use crate::store::RpcStore;
use crate::worker::{AgentKind, SyncWorker};
use andromeda_client::{AndromedaClient, AndromedaClientTrait};
use bigip_client::{BigIpClient, BigIpClientTrait, Credentials};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogSettings) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.compact().init(),
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AgentConfig::load()?;
    init_tracing(&config.log);

    info!("Starting Andromeda F5 Agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Andromeda URL: {}", config.andromeda.url);
    info!("  BigIP devices: {}", config.bigip.devices.join(", "));
    info!("  Domain suffix: {:?}", config.f5.domain_suffix);
    info!("  Admin listen address: {}", config.listen);

    let rpc: Arc<dyn AndromedaClientTrait> = Arc::new(AndromedaClient::new(
        config.andromeda.url.clone(),
        config.andromeda.token.clone(),
    )?);
    let store = Arc::new(RpcStore::new(Arc::clone(&rpc)));

    let credentials = Credentials {
        username: config.bigip.user.clone(),
        password: config.bigip.password.clone(),
    };
    let connect = |url: &str| {
        BigIpClient::new(url, &credentials, config.bigip.validate_certificates)
            .map_err(AgentError::from)
    };
    let (client, device) = retry(
        || select_active_device(&config.bigip.devices, &connect),
        &ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(30), 5),
    )
    .await?;
    ensure_dns_module(&device)?;
    let bigip: Arc<dyn BigIpClientTrait> = Arc::new(client);

    let agent = Arc::new(F5Agent::new(config.f5.clone(), store, rpc, bigip));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let declaration_agent = Arc::clone(&agent);
    let (declaration_worker, declaration_trigger) = SyncWorker::new(
        AgentKind::Declaration,
        agent.settings().sync_interval(),
        move || {
            let agent = Arc::clone(&declaration_agent);
            async move { agent.declaration_sync().await }
        },
        shutdown_rx.clone(),
    );

    let status_agent = Arc::clone(&agent);
    let (status_worker, _) = SyncWorker::new(
        AgentKind::Status,
        agent.settings().status_interval(),
        move || {
            let agent = Arc::clone(&status_agent);
            async move { agent.status_sync().await }
        },
        shutdown_rx.clone(),
    );

    let metrics_agent = Arc::clone(&agent);
    let (metrics_worker, _) = SyncWorker::new(
        AgentKind::Metrics,
        agent.settings().metrics_interval(),
        move || {
            let agent = Arc::clone(&metrics_agent);
            async move { agent.metrics_sync().await }
        },
        shutdown_rx.clone(),
    );

    let workers = [
        tokio::spawn(declaration_worker.run()),
        tokio::spawn(status_worker.run()),
        tokio::spawn(metrics_worker.run()),
    ];

    let addr: SocketAddr = config
        .listen
        .parse()
        .map_err(|e| AgentError::InvalidConfig(format!("invalid listen address: {e}")))?;
    let mut server_shutdown = shutdown_rx.clone();
    let server = tokio::spawn(server::serve(
        addr,
        Arc::new(AdminState {
            declaration_trigger,
        }),
        async move {
            let _ = server_shutdown.changed().await;
        },
    ));

    shutdown_signal().await;
    info!("Shutting down");
    let _ = shutdown_tx.send(true);

    for worker in workers {
        if let Err(e) = worker.await {
            error!("Worker task failed: {}", e);
        }
    }
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Admin server failed: {}", e),
        Err(e) => error!("Admin server task failed: {}", e),
    }

    info!("Andromeda F5 Agent stopped");
    Ok(())
}
