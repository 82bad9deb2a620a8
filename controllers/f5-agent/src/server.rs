//! Admin HTTP surface: on-demand sync, metrics and liveness.

use crate::error::AgentError;
use crate::metrics::gather_metrics;
use crate::worker::{SyncTrigger, TriggerOutcome};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state of the admin handlers
#[derive(Debug, Clone)]
pub struct AdminState {
    pub declaration_trigger: SyncTrigger,
}

/// `POST /sync`: queue a declaration sync without waiting for it
async fn sync_handler(State(state): State<Arc<AdminState>>) -> Response {
    match state.declaration_trigger.request() {
        TriggerOutcome::Queued => {
            info!("Declaration sync requested over HTTP");
            (StatusCode::ACCEPTED, Json(json!({"status": "queued"}))).into_response()
        }
        TriggerOutcome::AlreadyPending => {
            (StatusCode::ACCEPTED, Json(json!({"status": "already_pending"}))).into_response()
        }
        TriggerOutcome::Stopped => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "stopped"})),
        )
            .into_response(),
    }
}

async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(text) => (
            [("content-type", "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn healthz_handler() -> &'static str {
    "ok"
}

/// Create the admin router
pub fn create_router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/sync", post(sync_handler))
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the admin router on `addr` until `shutdown` resolves
pub async fn serve<S>(addr: SocketAddr, state: Arc<AdminState>, shutdown: S) -> Result<(), AgentError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Admin server listening on {}", addr);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
