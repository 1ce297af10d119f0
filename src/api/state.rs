//! Application state for the preflight API.

use std::sync::Arc;

use crate::config::{ConfigLoader, PreflightConfig};

/// Shared application state.
///
/// Holds the configuration loaded at startup; every request is evaluated
/// against it.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the configuration loader.
    pub fn loader(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &PreflightConfig {
        self.config.config()
    }
}
