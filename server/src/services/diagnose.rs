//! Diagnose service — validate, forward, normalize.
//!
//! DESIGN
//! ======
//! A request carries one chat message. It is validated from the raw JSON
//! body, trimmed, forwarded to the coordinator exactly once, and the outcome
//! is folded into either a `DiagnoseReply` or a `DiagnoseError`. Nothing is
//! retried and nothing is stored; each call is independent.
//!
//! ERROR HANDLING
//! ==============
//! Upstream failures are logged here with full detail. The route layer only
//! sees the classified `DiagnoseError` and renders a fixed client-facing body,
//! so upstream bodies and internal messages never reach the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, warn};

use crate::coordinator::CoordinatorError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "MediChain AI - Diagnostic API";
pub const FALLBACK_RESPONSE: &str = "No response from diagnostic system";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DiagnoseError {
    #[error("message is required and must be a non-empty string")]
    InvalidInput,

    #[error("coordinator timed out")]
    Timeout,

    #[error("coordinator unavailable: {0}")]
    Unavailable(String),

    #[error("coordinator returned status {status}")]
    Upstream { status: u16 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoordinatorError> for DiagnoseError {
    fn from(err: CoordinatorError) -> Self {
        match err {
            CoordinatorError::Timeout => Self::Timeout,
            CoordinatorError::Unreachable(msg) => Self::Unavailable(msg),
            CoordinatorError::Status { status, .. } => Self::Upstream { status },
            CoordinatorError::Decode(msg) | CoordinatorError::HttpClientBuild(msg) => Self::Internal(msg),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyMetadata {
    pub timestamp: String,
    pub coordinator_url: String,
}

/// Normalized success body for `POST /api/diagnose`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnoseReply {
    /// Usually a string; structured coordinator replies pass through unchanged.
    pub response: Value,
    pub metadata: ReplyMetadata,
}

/// Body for `GET /api/diagnose`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReply {
    pub status: String,
    pub service: String,
    pub coordinator_url: String,
    pub timestamp: String,
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Extract the trimmed `message` from a request body.
///
/// # Errors
///
/// Returns [`DiagnoseError::InvalidInput`] if the body is not an object, or
/// `message` is missing, null, not a string, or blank after trimming.
pub fn validate_message(body: &Value) -> Result<String, DiagnoseError> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(DiagnoseError::InvalidInput)?;
    Ok(message.to_string())
}

/// Validate `body`, forward the message to the coordinator, normalize the reply.
///
/// # Errors
///
/// Returns a [`DiagnoseError`] classifying the validation or upstream failure.
pub async fn diagnose(state: &AppState, body: &Value) -> Result<DiagnoseReply, DiagnoseError> {
    let message = validate_message(body)?;

    let reply = state.coordinator.diagnose(&message).await.map_err(|err| {
        log_coordinator_error(&state.coordinator_url, &err);
        DiagnoseError::from(err)
    })?;

    let response = reply.relayed().cloned().unwrap_or_else(|| Value::from(FALLBACK_RESPONSE));
    info!(chars = message.len(), "diagnose relayed");

    Ok(DiagnoseReply {
        response,
        metadata: ReplyMetadata { timestamp: now_rfc3339(), coordinator_url: state.coordinator_url.to_string() },
    })
}

/// Static service identity. Never touches the coordinator.
#[must_use]
pub fn health(state: &AppState) -> HealthReply {
    HealthReply {
        status: "ok".into(),
        service: SERVICE_NAME.into(),
        coordinator_url: state.coordinator_url.to_string(),
        timestamp: now_rfc3339(),
    }
}

fn log_coordinator_error(coordinator_url: &str, err: &CoordinatorError) {
    match err {
        CoordinatorError::Timeout => warn!(coordinator_url, "coordinator request timed out"),
        CoordinatorError::Status { status, body } => {
            error!(coordinator_url, status, body = %body, "coordinator error response");
        }
        other => error!(coordinator_url, error = %other, "coordinator call failed"),
    }
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[cfg(test)]
#[path = "diagnose_test.rs"]
mod tests;
