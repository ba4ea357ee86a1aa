//! Gateway configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_COORDINATOR_URL: &str = "http://localhost:8080";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Hard deadline for one coordinator round trip. Not configurable.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl Default for CoordinatorTimeouts {
    fn default() -> Self {
        Self { request: REQUEST_TIMEOUT, connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Coordinator base URL, without a trailing slash.
    pub coordinator_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub timeouts: CoordinatorTimeouts,
}

impl GatewayConfig {
    /// Build typed gateway config from environment variables.
    ///
    /// Optional:
    /// - `COORDINATOR_URL`: default `http://localhost:8080`
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `COORDINATOR_CONNECT_TIMEOUT_SECS`: default 10, capped at the request deadline
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let coordinator_url = normalize_base_url(
            &std::env::var("COORDINATOR_URL").unwrap_or_else(|_| DEFAULT_COORDINATOR_URL.to_string()),
        );
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let connect_secs = env_parse_u64("COORDINATOR_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS);
        let timeouts = CoordinatorTimeouts {
            request: REQUEST_TIMEOUT,
            connect: Duration::from_secs(connect_secs).min(REQUEST_TIMEOUT),
        };

        Ok(Self { coordinator_url, bind_addr, port, timeouts })
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid { var: "PORT", value: value.to_string() }),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
