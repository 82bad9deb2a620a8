//! Read-only access to the desired-state snapshot of the F5 provider.

use crate::error::AgentError;
use andromeda_client::{AndromedaClientTrait, Datacenter, Domain, Member, SearchRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Provider name used to scope every search
pub const F5_PROVIDER: &str = "f5";

/// Page size for search RPCs
pub const PAGE_SIZE: u32 = 1000;

/// Snapshot accessor consumed by the declaration builders and the status poller
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Every datacenter of the provider
    async fn get_datacenters(&self) -> Result<Vec<Datacenter>, AgentError>;

    /// Every domain of the provider, fully populated
    async fn get_domains(&self) -> Result<Vec<Domain>, AgentError>;

    /// Every member located in `datacenter_id`
    async fn get_members(&self, datacenter_id: &str) -> Result<Vec<Member>, AgentError>;
}

/// [`Store`] backed by the Andromeda RPC service
#[derive(Clone)]
pub struct RpcStore {
    client: Arc<dyn AndromedaClientTrait>,
}

impl std::fmt::Debug for RpcStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcStore").finish_non_exhaustive()
    }
}

impl RpcStore {
    pub fn new(client: Arc<dyn AndromedaClientTrait>) -> Self {
        Self { client }
    }
}

/// Walk every page of a search until an empty page comes back
///
/// A short page does not end the walk; the service may cap pages below
/// [`PAGE_SIZE`].
async fn fetch_all_pages<T, F, Fut>(base: SearchRequest, mut fetch: F) -> Result<Vec<T>, AgentError>
where
    F: FnMut(SearchRequest) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<T>, AgentError>>,
{
    let mut all_results = Vec::new();
    let mut page_number = 0;
    let mut after_short_page = false;
    loop {
        let request = SearchRequest {
            page_number,
            result_per_page: PAGE_SIZE,
            ..base.clone()
        };
        let page = fetch(request).await?;
        if page.is_empty() {
            break;
        }
        if after_short_page {
            warn!(
                "Page {} followed a short page; the service caps pages below {} results",
                page_number, PAGE_SIZE
            );
        }
        after_short_page = page.len() < PAGE_SIZE as usize;
        all_results.extend(page);
        page_number += 1;
        debug!("Fetching result page {}", page_number);
    }
    Ok(all_results)
}

#[async_trait::async_trait]
impl Store for RpcStore {
    async fn get_datacenters(&self) -> Result<Vec<Datacenter>, AgentError> {
        let base = SearchRequest {
            provider: Some(F5_PROVIDER.to_string()),
            ..SearchRequest::default()
        };
        let datacenters = fetch_all_pages(base, |request| async move {
            self.client
                .get_datacenters(&request)
                .await
                .map_err(|e| AgentError::Store(format!("rpc GetDatacenters failed: {e}")))
        })
        .await?;

        // An empty list would make the declaration drop every server
        if datacenters.is_empty() {
            return Err(AgentError::Store("no F5 datacenters found".to_string()));
        }
        Ok(datacenters)
    }

    async fn get_domains(&self) -> Result<Vec<Domain>, AgentError> {
        let base = SearchRequest {
            provider: Some(F5_PROVIDER.to_string()),
            fully_populated: true,
            ..SearchRequest::default()
        };
        fetch_all_pages(base, |request| async move {
            self.client
                .get_domains(&request)
                .await
                .map_err(|e| AgentError::Store(format!("rpc GetDomains failed: {e}")))
        })
        .await
    }

    async fn get_members(&self, datacenter_id: &str) -> Result<Vec<Member>, AgentError> {
        let base = SearchRequest {
            datacenter_id: Some(datacenter_id.to_string()),
            ..SearchRequest::default()
        };
        fetch_all_pages(base, |request| async move {
            self.client
                .get_members(&request)
                .await
                .map_err(|e| AgentError::Store(format!("rpc GetMembers failed: {e}")))
        })
        .await
    }
}
