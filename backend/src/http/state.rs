//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::SkyEngine;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Engine instance shared by every request
    pub engine: Arc<SkyEngine>,
}

impl AppState {
    /// Create a new application state with the given engine.
    pub fn new(engine: Arc<SkyEngine>) -> Self {
        Self { engine }
    }
}
