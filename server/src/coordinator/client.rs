//! reqwest-backed coordinator client.
//!
//! One client is built at startup and shared across requests so connections
//! are pooled. The request timeout covers the whole round trip including the
//! response body; when it fires the in-flight request is dropped.

use async_trait::async_trait;

use super::CoordinatorApi;
use super::types::{CoordinatorError, CoordinatorReply, DiagnoseRequest};
use crate::config::{CoordinatorTimeouts, GatewayConfig};

const DIAGNOSE_PATH: &str = "/api/diagnose";

pub struct CoordinatorClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoordinatorClient {
    /// Build a client from gateway config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, CoordinatorError> {
        Self::new(&config.coordinator_url, config.timeouts)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeouts: CoordinatorTimeouts) -> Result<Self, CoordinatorError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| CoordinatorError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn diagnose_url(&self) -> String {
        format!("{}{DIAGNOSE_PATH}", self.base_url)
    }
}

#[async_trait]
impl CoordinatorApi for CoordinatorClient {
    async fn diagnose(&self, message: &str) -> Result<CoordinatorReply, CoordinatorError> {
        let response = self
            .http
            .post(self.diagnose_url())
            .json(&DiagnoseRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Body is for logs only; a failed read must not mask the status.
            let body = response.text().await.unwrap_or_default();
            return Err(CoordinatorError::Status { status: status.as_u16(), body });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| CoordinatorError::Decode(e.to_string()))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
