//! Coordinator wire types and errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the outbound coordinator call.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// The request deadline passed before the coordinator answered.
    #[error("coordinator request timed out")]
    Timeout,

    /// The coordinator could not be reached (refused, DNS, reset).
    #[error("coordinator unreachable: {0}")]
    Unreachable(String),

    /// The coordinator answered with a non-success HTTP status.
    #[error("coordinator response error: status {status}")]
    Status { status: u16, body: String },

    /// The coordinator's success body was not JSON.
    #[error("coordinator response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl From<reqwest::Error> for CoordinatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { Self::Timeout } else { Self::Unreachable(err.to_string()) }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Body sent to `POST {COORDINATOR_URL}/api/diagnose`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnoseRequest<'a> {
    pub message: &'a str,
}

/// Coordinator success payload. Opaque apart from `response` and `error`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CoordinatorReply(pub Value);

impl CoordinatorReply {
    /// First truthy value among `response` then `error`, relayed as-is.
    #[must_use]
    pub fn relayed(&self) -> Option<&Value> {
        ["response", "error"]
            .iter()
            .find_map(|key| self.0.get(*key).filter(|v| is_truthy(v)))
    }
}

/// `null`, `false`, `0` and `""` are empty; everything else, including
/// empty objects and arrays, carries a reply.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
