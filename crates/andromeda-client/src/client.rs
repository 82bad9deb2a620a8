//! Andromeda RPC client
//!
//! Every RPC is a JSON `POST {base_url}/rpc/{Method}`. Search methods answer
//! with a `{"response": [...]}` envelope, update methods with an empty body.

use crate::andromeda_trait::AndromedaClientTrait;
use crate::error::AndromedaError;
use crate::models::*;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the Andromeda desired-state service
#[derive(Debug, Clone)]
pub struct AndromedaClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl AndromedaClient {
    /// Create a new Andromeda client
    ///
    /// # Arguments
    /// * `base_url` - Service base URL (e.g., "http://andromeda-rpc:8080")
    /// * `token` - Optional bearer token
    pub fn new(base_url: String, token: Option<String>) -> Result<Self, AndromedaError> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AndromedaError::InvalidRequest(format!(
                "base URL must be http(s): {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AndromedaError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method_url(&self, method: RpcMethod) -> String {
        format!("{}/rpc/{}", self.base_url, method)
    }

    /// POST one RPC and return the raw response body
    async fn call<B: Serialize + ?Sized>(&self, method: RpcMethod, body: &B) -> Result<String, AndromedaError> {
        let url = self.method_url(method);
        debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(AndromedaError::Http)?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match status {
            s if s.is_success() => Ok(text),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AndromedaError::Authentication(
                format!("{method} rejected: {status} - {text}"),
            )),
            StatusCode::NOT_FOUND => Err(AndromedaError::NotFound(format!(
                "RPC method not found: {method} - {text}"
            ))),
            _ => Err(AndromedaError::Api(format!(
                "{method} failed: {status} - {text}"
            ))),
        }
    }

    async fn search<T: DeserializeOwned>(
        &self,
        method: RpcMethod,
        request: &SearchRequest,
    ) -> Result<Vec<T>, AndromedaError> {
        let text = self.call(method, request).await?;
        let envelope: SearchResponse<T> = serde_json::from_str(&text).map_err(|e| {
            AndromedaError::Api(format!(
                "error decoding {method} response: {e} - Response (first 500 chars): {}",
                text.chars().take(500).collect::<String>()
            ))
        })?;
        Ok(envelope.response)
    }
}

#[async_trait::async_trait]
impl AndromedaClientTrait for AndromedaClient {
    async fn get_datacenters(&self, request: &SearchRequest) -> Result<Vec<Datacenter>, AndromedaError> {
        self.search(RpcMethod::GetDatacenters, request).await
    }

    async fn get_domains(&self, request: &SearchRequest) -> Result<Vec<Domain>, AndromedaError> {
        self.search(RpcMethod::GetDomains, request).await
    }

    async fn get_members(&self, request: &SearchRequest) -> Result<Vec<Member>, AndromedaError> {
        self.search(RpcMethod::GetMembers, request).await
    }

    async fn update_provisioning_status(
        &self,
        updates: &[ProvisioningStatusUpdate],
    ) -> Result<(), AndromedaError> {
        let body = ProvisioningStatusRequest {
            provisioning_status: updates.to_vec(),
        };
        self.call(RpcMethod::UpdateProvisioningStatus, &body).await?;
        Ok(())
    }

    async fn update_member_status(&self, updates: &[MemberStatusUpdate]) -> Result<(), AndromedaError> {
        let body = MemberStatusRequest {
            member_status: updates.to_vec(),
        };
        self.call(RpcMethod::UpdateMemberStatus, &body).await?;
        Ok(())
    }
}
