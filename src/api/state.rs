use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::infrastructure::pipeline::Mediator;

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    /// Every catalog route dispatches through here
    pub mediator: Arc<Mediator>,
    /// Probed by the readiness endpoint
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    pub fn new(mediator: Arc<Mediator>, cache: Arc<dyn Cache>) -> Self {
        Self { mediator, cache }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("mediator", &self.mediator)
            .finish_non_exhaustive()
    }
}
