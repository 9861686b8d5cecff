use crate::core::{MetadataMap, RecordClient, RemoteRecord};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://zenodo.org/api";

/// Zenodo REST client authenticated with a personal access token.
#[derive(Debug, Clone)]
pub struct ZenodoClient {
    client: Client,
    api_base: String,
    access_token: String,
}

impl ZenodoClient {
    pub fn new(api_base: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/records/{}", self.api_base, record_id)
    }

    fn deposition_url(&self, deposition_id: &str) -> String {
        format!("{}/deposit/depositions/{}", self.api_base, deposition_id)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<RemoteRecord> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        tracing::debug!("{} -> {}", url, response.status());
        let response = check_status(response, url).await?;
        Ok(response.json::<RemoteRecord>().await?)
    }
}

/// Non-2xx responses become `SyncError::Http` carrying the full body.
async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!("Request to {} failed with {}: {}", url, status, body);
    Err(SyncError::Http {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}

#[async_trait]
impl RecordClient for ZenodoClient {
    async fn fetch_record(&self, record_id: &str) -> Result<RemoteRecord> {
        let url = self.record_url(record_id);
        tracing::info!("Fetching record {}...", record_id);
        self.send(self.client.get(&url), &url).await
    }

    async fn fetch_deposition(&self, deposition_id: &str) -> Result<RemoteRecord> {
        let url = self.deposition_url(deposition_id);
        tracing::info!("Fetching deposition {}...", deposition_id);
        self.send(self.client.get(&url), &url).await
    }

    async fn update_deposition(
        &self,
        deposition_id: &str,
        metadata: &MetadataMap,
    ) -> Result<RemoteRecord> {
        let url = self.deposition_url(deposition_id);
        tracing::info!("Updating deposition {}...", deposition_id);
        let request = self.client.put(&url).json(&json!({ "metadata": metadata }));
        self.send(request, &url).await
    }

    async fn create_new_version(&self, record_id: &str) -> Result<RemoteRecord> {
        let url = format!("{}/versions", self.record_url(record_id));
        tracing::info!("Creating new version of record {}...", record_id);
        let request = self.client.post(&url).json(&json!({}));
        self.send(request, &url).await
    }
}
