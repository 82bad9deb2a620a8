//! Mock BigIpClient for unit testing
//!
//! Serves stubbed iControl responses by path and records every declaration
//! that gets posted.

use crate::bigip_trait::BigIpClientTrait;
use crate::error::BigIpError;
use crate::models::{As3Response, Device};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
enum Stub {
    Json(serde_json::Value),
    Error(String),
}

/// Mock BigIP session for testing
///
/// Paths without a stub answer with [`BigIpError::NotFound`].
#[derive(Debug, Clone)]
pub struct MockBigIpClient {
    host: String,
    stubs: Arc<Mutex<HashMap<String, Stub>>>,
    devices: Arc<Mutex<Vec<Device>>>,
    requested_paths: Arc<Mutex<Vec<String>>>,
    posted: Arc<Mutex<Vec<String>>>,
    post_failure: Arc<Mutex<Option<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBigIpClient {
    /// Create a new mock session for `host`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            stubs: Arc::new(Mutex::new(HashMap::new())),
            devices: Arc::new(Mutex::new(Vec::new())),
            requested_paths: Arc::new(Mutex::new(Vec::new())),
            posted: Arc::new(Mutex::new(Vec::new())),
            post_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Answer GETs of `path` with `body` (for test setup)
    pub fn set_response(&self, path: impl Into<String>, body: serde_json::Value) {
        lock(&self.stubs).insert(path.into(), Stub::Json(body));
    }

    /// Answer GETs of `path` with a non-404 API error (for test setup)
    pub fn set_error(&self, path: impl Into<String>, message: impl Into<String>) {
        lock(&self.stubs).insert(path.into(), Stub::Error(message.into()));
    }

    /// Add a device returned by `get_devices` (for test setup)
    pub fn add_device(&self, device: Device) {
        lock(&self.devices).push(device);
    }

    /// Make every subsequent declaration POST fail
    pub fn fail_post(&self, message: impl Into<String>) {
        *lock(&self.post_failure) = Some(message.into());
    }

    /// Declarations posted so far (including rejected ones)
    pub fn posted_declarations(&self) -> Vec<String> {
        lock(&self.posted).clone()
    }

    /// Paths requested through `get`, in order
    pub fn requested_paths(&self) -> Vec<String> {
        lock(&self.requested_paths).clone()
    }
}

#[async_trait::async_trait]
impl BigIpClientTrait for MockBigIpClient {
    fn host(&self) -> &str {
        &self.host
    }

    async fn get(&self, path: &str) -> Result<serde_json::Value, BigIpError> {
        lock(&self.requested_paths).push(path.to_string());
        match lock(&self.stubs).get(path) {
            Some(Stub::Json(value)) => Ok(value.clone()),
            Some(Stub::Error(message)) => Err(BigIpError::Api {
                status: 500,
                body: message.clone(),
            }),
            None => Err(BigIpError::NotFound(path.to_string())),
        }
    }

    async fn post_declaration(&self, declaration: String) -> Result<As3Response, BigIpError> {
        lock(&self.posted).push(declaration);
        match lock(&self.post_failure).as_ref() {
            Some(message) => Err(BigIpError::DeclarationRejected {
                status: 422,
                issues: vec![message.clone()],
            }),
            None => Ok(As3Response::default()),
        }
    }

    async fn get_devices(&self) -> Result<Vec<Device>, BigIpError> {
        lock(&self.requested_paths).push("cm/device".to_string());
        Ok(lock(&self.devices).clone())
    }
}
