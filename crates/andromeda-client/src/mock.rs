//! Mock AndromedaClient for unit testing
//!
//! In-memory implementation of [`AndromedaClientTrait`] that serves a fixed
//! desired-state snapshot, records every call and published batch, and can be
//! told to fail individual RPC methods.

use crate::andromeda_trait::AndromedaClientTrait;
use crate::error::AndromedaError;
use crate::models::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One recorded RPC invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: RpcMethod,
    pub request: Option<SearchRequest>,
}

/// Mock Andromeda client for testing
#[derive(Debug, Clone, Default)]
pub struct MockAndromedaClient {
    datacenters: Arc<Mutex<Vec<Datacenter>>>,
    domains: Arc<Mutex<Vec<Domain>>>,
    members: Arc<Mutex<Vec<Member>>>,
    failures: Arc<Mutex<HashMap<RpcMethod, String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    provisioning_batches: Arc<Mutex<Vec<Vec<ProvisioningStatusUpdate>>>>,
    member_status_batches: Arc<Mutex<Vec<Vec<MemberStatusUpdate>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn page<T: Clone>(items: &[T], request: &SearchRequest) -> Vec<T> {
    if request.result_per_page == 0 {
        return items.to_vec();
    }
    let per_page = request.result_per_page as usize;
    items
        .iter()
        .skip(request.page_number as usize * per_page)
        .take(per_page)
        .cloned()
        .collect()
}

impl MockAndromedaClient {
    /// Create an empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a datacenter (for test setup)
    pub fn add_datacenter(&self, datacenter: Datacenter) {
        lock(&self.datacenters).push(datacenter);
    }

    /// Add a domain (for test setup)
    pub fn add_domain(&self, domain: Domain) {
        lock(&self.domains).push(domain);
    }

    /// Add a member returned by `get_members` for its `datacenter_id` (for test setup)
    pub fn add_member(&self, member: Member) {
        lock(&self.members).push(member);
    }

    /// Make every subsequent call of `method` fail with an API error
    pub fn fail_on(&self, method: RpcMethod, message: impl Into<String>) {
        lock(&self.failures).insert(method, message.into());
    }

    /// Undo [`MockAndromedaClient::fail_on`]
    pub fn clear_failure(&self, method: RpcMethod) {
        lock(&self.failures).remove(&method);
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of recorded calls of `method`
    pub fn call_count(&self, method: RpcMethod) -> usize {
        lock(&self.calls).iter().filter(|c| c.method == method).count()
    }

    /// Datacenter ids of first-page `get_members` calls, in call order
    pub fn member_lookups(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.method == RpcMethod::GetMembers)
            .filter_map(|c| c.request.as_ref())
            .filter(|r| r.page_number == 0)
            .filter_map(|r| r.datacenter_id.clone())
            .collect()
    }

    /// Provisioning status batches published so far
    pub fn provisioning_batches(&self) -> Vec<Vec<ProvisioningStatusUpdate>> {
        lock(&self.provisioning_batches).clone()
    }

    /// Member status batches published so far
    pub fn member_status_batches(&self) -> Vec<Vec<MemberStatusUpdate>> {
        lock(&self.member_status_batches).clone()
    }

    fn record(&self, method: RpcMethod, request: Option<&SearchRequest>) -> Result<(), AndromedaError> {
        lock(&self.calls).push(RecordedCall {
            method,
            request: request.cloned(),
        });
        match lock(&self.failures).get(&method) {
            Some(message) => Err(AndromedaError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl AndromedaClientTrait for MockAndromedaClient {
    async fn get_datacenters(&self, request: &SearchRequest) -> Result<Vec<Datacenter>, AndromedaError> {
        self.record(RpcMethod::GetDatacenters, Some(request))?;
        Ok(page(&lock(&self.datacenters), request))
    }

    async fn get_domains(&self, request: &SearchRequest) -> Result<Vec<Domain>, AndromedaError> {
        self.record(RpcMethod::GetDomains, Some(request))?;
        Ok(page(&lock(&self.domains), request))
    }

    async fn get_members(&self, request: &SearchRequest) -> Result<Vec<Member>, AndromedaError> {
        self.record(RpcMethod::GetMembers, Some(request))?;
        let members: Vec<Member> = lock(&self.members)
            .iter()
            .filter(|m| {
                request
                    .datacenter_id
                    .as_deref()
                    .is_none_or(|dc| m.datacenter_id == dc)
            })
            .cloned()
            .collect();
        Ok(page(&members, request))
    }

    async fn update_provisioning_status(
        &self,
        updates: &[ProvisioningStatusUpdate],
    ) -> Result<(), AndromedaError> {
        self.record(RpcMethod::UpdateProvisioningStatus, None)?;
        lock(&self.provisioning_batches).push(updates.to_vec());
        Ok(())
    }

    async fn update_member_status(&self, updates: &[MemberStatusUpdate]) -> Result<(), AndromedaError> {
        self.record(RpcMethod::UpdateMemberStatus, None)?;
        lock(&self.member_status_batches).push(updates.to_vec());
        Ok(())
    }
}
