//! Shared application state.

use rapport_core::RapportConfig;

use crate::engine::Engine;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: RapportConfig,
    pub engine: Engine,
}

impl AppState {
    pub fn new(config: RapportConfig, engine: Engine) -> Self {
        Self { config, engine }
    }
}
