//! RemoteClient — network client for a running Metapedia server
//!
//! Connects via HTTP to the Metapedia HTTP API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::client::MetapediaClient;
use crate::error::{MetapediaError, MetapediaResult};
use crate::models::ServerStatus;
use metapedia::resolver::{LookupKey, ResolutionResult};

/// Network client that connects to a running Metapedia server.
///
/// Uses `/metapedia/v1/category_path` and `/api/status`.
pub struct RemoteClient {
    http_base_url: String,
    http_client: Client,
}

impl RemoteClient {
    /// Create a new RemoteClient connecting to the given HTTP base URL.
    ///
    /// # Example
    /// ```no_run
    /// # use metapedia_sdk::RemoteClient;
    /// let client = RemoteClient::new("http://localhost:8080");
    /// ```
    pub fn new(http_base_url: &str) -> Self {
        Self {
            http_base_url: http_base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.http_base_url
    }

    /// Decode a success body, or turn the server's `{"error": ...}` into `Api`
    async fn decode<T: DeserializeOwned>(response: Response) -> MetapediaResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: serde_json::Value = response.json().await
            .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
        let message = error_body.get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Err(MetapediaError::Api { status: status.as_u16(), message })
    }
}

#[async_trait]
impl MetapediaClient for RemoteClient {
    async fn category_path(
        &self,
        lang: &str,
        source: &str,
        target: &str,
    ) -> MetapediaResult<ResolutionResult> {
        let url = format!("{}/metapedia/v1/category_path", self.http_base_url);
        let body = serde_json::json!({ "lang": lang, "source": source, "target": target });

        let response = self.http_client.post(&url)
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn recent(&self) -> MetapediaResult<Vec<LookupKey>> {
        let url = format!("{}/metapedia/v1/category_path/recent", self.http_base_url);
        let response = self.http_client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn status(&self) -> MetapediaResult<ServerStatus> {
        let url = format!("{}/api/status", self.http_base_url);
        let response = self.http_client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn ping(&self) -> MetapediaResult<String> {
        let status = self.status().await?;
        if status.is_healthy() {
            Ok("PONG".to_string())
        } else {
            Err(MetapediaError::ConnectionError(format!(
                "Server {}: {}",
                status.status,
                status.store.error.unwrap_or_default()
            )))
        }
    }
}
