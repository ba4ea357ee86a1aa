//! Coordinator — outbound adapter for the external diagnostic service.
//!
//! DESIGN
//! ======
//! The coordinator is a black box reachable at `COORDINATOR_URL`. This module
//! owns the single outbound call (`POST /api/diagnose`) and classifies its
//! failures so the service layer can map them to HTTP statuses. Handlers only
//! see the `CoordinatorApi` trait, which keeps them testable without a live
//! upstream.

pub mod client;
pub mod types;

pub use client::CoordinatorClient;
pub use types::{CoordinatorError, CoordinatorReply, DiagnoseRequest};

/// Async seam over the coordinator. Enables mocking in tests.
#[async_trait::async_trait]
pub trait CoordinatorApi: Send + Sync {
    /// Forward one already-validated message to the coordinator.
    ///
    /// # Errors
    ///
    /// Returns a [`CoordinatorError`] when the deadline passes, the upstream
    /// cannot be reached, it answers with a non-success status, or its body
    /// is not JSON.
    async fn diagnose(&self, message: &str) -> Result<CoordinatorReply, CoordinatorError>;
}
