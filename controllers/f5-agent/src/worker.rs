//! Sync worker: one scheduling loop per agent role.
//!
//! A worker fires its cycle on a fixed interval and whenever an on-demand
//! trigger arrives. Every fired cycle runs in its own task, so a slow cycle
//! never holds back the next tick and two cycles may overlap.

use crate::error::AgentError;
use crate::metrics::record_sync_success;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// Agent role, used as the `agent` metrics label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Declaration,
    Status,
    Metrics,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Declaration => "declaration",
            AgentKind::Status => "status",
            AgentKind::Metrics => "metrics",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an on-demand sync request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A cycle will start shortly
    Queued,
    /// A request is already waiting to be picked up
    AlreadyPending,
    /// The worker has stopped
    Stopped,
}

/// Handle used to request an immediate cycle; never blocks
#[derive(Debug, Clone)]
pub struct SyncTrigger {
    tx: mpsc::Sender<()>,
}

impl SyncTrigger {
    pub fn request(&self) -> TriggerOutcome {
        match self.tx.try_send(()) {
            Ok(()) => TriggerOutcome::Queued,
            Err(TrySendError::Full(())) => TriggerOutcome::AlreadyPending,
            Err(TrySendError::Closed(())) => TriggerOutcome::Stopped,
        }
    }
}

/// Run one cycle, recording the sync gauges on success
///
/// Failures are logged and dropped here; nothing below retries on its own.
pub async fn run_cycle<Fut>(kind: AgentKind, cycle: Fut) -> bool
where
    Fut: Future<Output = Result<(), AgentError>>,
{
    let start = Instant::now();
    match cycle.await {
        Ok(()) => {
            let duration = start.elapsed();
            record_sync_success(kind.as_str(), duration);
            info!("{} sync completed in {:?}", kind, duration);
            true
        }
        Err(e) => {
            error!("{} sync failed after {:?}: {}", kind, start.elapsed(), e);
            false
        }
    }
}

/// Periodic and on-demand driver of one agent role
pub struct SyncWorker<F> {
    kind: AgentKind,
    interval: Duration,
    cycle: F,
    trigger_rx: mpsc::Receiver<()>,
    shutdown: watch::Receiver<bool>,
}

impl<F> fmt::Debug for SyncWorker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncWorker")
            .field("kind", &self.kind)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<F, Fut> SyncWorker<F>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), AgentError>> + Send + 'static,
{
    /// Create a worker and the trigger feeding it
    ///
    /// The worker stops once `shutdown` flips (or its sender is dropped).
    pub fn new(
        kind: AgentKind,
        interval: Duration,
        cycle: F,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, SyncTrigger) {
        let (tx, trigger_rx) = mpsc::channel(1);
        let worker = Self {
            kind,
            interval,
            cycle,
            trigger_rx,
            shutdown,
        };
        (worker, SyncTrigger { tx })
    }

    /// Run until shutdown; the first tick fires immediately
    pub async fn run(mut self) {
        info!("Starting {} worker (interval {:?})", self.kind, self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("{} sync tick", self.kind);
                    in_flight.spawn(run_cycle(self.kind, (self.cycle)()));
                }
                Some(()) = self.trigger_rx.recv() => {
                    info!("{} sync requested", self.kind);
                    in_flight.spawn(run_cycle(self.kind, (self.cycle)()));
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                _ = self.shutdown.changed() => break,
            }
        }

        info!(
            "Stopping {} worker, {} cycle(s) still running",
            self.kind,
            in_flight.len()
        );
        while in_flight.join_next().await.is_some() {}
    }
}
