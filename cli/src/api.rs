//! HTTP client for the gateway's diagnose endpoint.
//!
//! ERROR HANDLING
//! ==============
//! Every failure collapses into `ApiError`. The chat session never shows
//! these to the user directly; it renders a fixed connection-error bubble.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Shown when a 2xx reply carries neither `response` nor `error` text.
pub const EMPTY_REPLY: &str = "No response received";

// Slightly above the gateway's own 30 s upstream deadline so its 504 arrives first.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway returned HTTP {0}")]
    Status(u16),
}

/// Async seam over `POST /api/diagnose`. Enables mocking in tests.
#[async_trait]
pub trait DiagnoseApi: Send + Sync {
    /// Send one message and return the assistant text to display.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, a non-2xx status, or an
    /// undecodable body.
    async fn diagnose(&self, message: &str) -> Result<String, ApiError>;
}

pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    fn url(&self) -> String {
        format!("{}/api/diagnose", self.base_url)
    }

    /// `GET /api/diagnose`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn health(&self) -> Result<Value, ApiError> {
        let response = self.http.get(self.url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl DiagnoseApi for GatewayClient {
    async fn diagnose(&self, message: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url())
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.json::<Value>().await?;
        Ok(reply_text(&body))
    }
}

/// `response`, else `error`, else [`EMPTY_REPLY`]. Structured values are
/// shown as pretty-printed JSON.
#[must_use]
pub fn reply_text(body: &Value) -> String {
    let value = ["response", "error"].iter().find_map(|key| match body.get(*key) {
        None | Some(Value::Null | Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(v) => Some(v),
    });
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        None => EMPTY_REPLY.to_owned(),
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
