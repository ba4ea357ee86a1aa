//! Diagnose proxy routes.
//!
//! `POST /api/diagnose` forwards one chat message to the coordinator.
//! `GET /api/diagnose` is a static health check.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::services::diagnose::{self as service, DiagnoseError, DiagnoseReply, HealthReply};
use crate::state::AppState;

/// Client-facing failure body. Never carries upstream or internal detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

impl ErrorBody {
    fn new(error: &str, details: impl Into<String>) -> Self {
        Self { error: error.into(), details: details.into() }
    }

    pub(crate) fn internal() -> Self {
        Self::new("Internal server error", "An unexpected error occurred while processing your request")
    }
}

/// `POST /api/diagnose` — validate, forward, normalize.
pub async fn diagnose(State(state): State<AppState>, body: Bytes) -> Result<Json<DiagnoseReply>, DiagnoseError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| DiagnoseError::Internal(e.to_string()))?;
    let reply = service::diagnose(&state, &body).await?;
    Ok(Json(reply))
}

/// `GET /api/diagnose` — service identity, no upstream call.
pub async fn health(State(state): State<AppState>) -> Json<HealthReply> {
    Json(service::health(&state))
}

pub(crate) fn diagnose_error_to_status(err: &DiagnoseError) -> StatusCode {
    match err {
        DiagnoseError::InvalidInput => StatusCode::BAD_REQUEST,
        DiagnoseError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        DiagnoseError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DiagnoseError::Upstream { status } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
        DiagnoseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_body(err: &DiagnoseError) -> ErrorBody {
    match err {
        DiagnoseError::InvalidInput => {
            ErrorBody::new("Invalid input", "Message is required and must be a non-empty string")
        }
        DiagnoseError::Timeout => ErrorBody::new(
            "Request timeout",
            "The diagnostic system took too long to respond. Please try again.",
        ),
        DiagnoseError::Unavailable(_) => ErrorBody::new(
            "Service unavailable",
            "Unable to connect to the diagnostic system. The coordinator agent may be offline.",
        ),
        DiagnoseError::Upstream { status } => ErrorBody::new(
            "Diagnostic system error",
            format!("The diagnostic system returned an error ({status})"),
        ),
        DiagnoseError::Internal(_) => ErrorBody::internal(),
    }
}

impl IntoResponse for DiagnoseError {
    fn into_response(self) -> Response {
        if let DiagnoseError::Internal(detail) = &self {
            error!(error = %detail, "diagnose request failed");
        }
        (diagnose_error_to_status(&self), Json(error_body(&self))).into_response()
    }
}

#[cfg(test)]
#[path = "diagnose_test.rs"]
mod tests;
