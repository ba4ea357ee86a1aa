//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! read-only after startup: the coordinator client and the base URL reported
//! in reply metadata. Handlers hold no shared mutable state, so concurrent
//! requests need no locking.

use std::sync::Arc;

use crate::coordinator::CoordinatorApi;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<dyn CoordinatorApi>,
    /// Base URL echoed in reply metadata and the health payload.
    pub coordinator_url: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(coordinator: Arc<dyn CoordinatorApi>, coordinator_url: &str) -> Self {
        Self { coordinator, coordinator_url: Arc::from(coordinator_url) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
