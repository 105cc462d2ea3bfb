//! Application state for the HTTP server

use crate::{ArtifactService, Config};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the artifact service and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The artifact service answering every request
    pub service: Arc<ArtifactService>,

    /// Configuration (prefix list, timeouts)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service: Arc<ArtifactService>, config: Arc<Config>) -> Self {
        Self { service, config }
    }
}
