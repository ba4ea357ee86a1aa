//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the gateway's HTTP surface: the diagnose proxy and its
//! health check under `/api/diagnose`, plus a bare `/healthz` liveness probe.
//! Browser clients call it cross-origin, so CORS is open. Handler panics are
//! caught at the outermost layer and rendered as a plain 500 body.

pub mod diagnose;

use std::any::Any;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full gateway router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/api/diagnose", get(diagnose::health).post(diagnose::diagnose))
        .route("/healthz", get(healthz))
        // Messages are forwarded whole; the coordinator owns any size policy.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(diagnose::ErrorBody::internal())).into_response()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
