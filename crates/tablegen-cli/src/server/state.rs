//! Shared application state for the server.
//!
//! State is shared across handlers via `Arc`.

use std::sync::Arc;

use crate::generate::{self, GenerateError, GenerateRequest, GenerateResponse};

/// Blocking generation backend. Swapped out in tests.
pub type Generator =
    dyn Fn(&GenerateRequest) -> Result<GenerateResponse, GenerateError> + Send + Sync;

/// Server configuration derived from CLI arguments and the config file.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Connection settings used when a request leaves them out
    pub defaults: GenerateRequest,
}

/// Shared application state.
pub struct AppState {
    pub config: ServerConfig,
    pub generator: Arc<Generator>,
}

impl AppState {
    /// State backed by live database connections.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_generator(config, Arc::new(generate::generate))
    }

    pub fn with_generator(config: ServerConfig, generator: Arc<Generator>) -> Self {
        Self { config, generator }
    }

    /// Fill connection settings missing from `request` with the server defaults.
    ///
    /// Table, query and column lists are never defaulted.
    pub fn complete_request(&self, mut request: GenerateRequest) -> GenerateRequest {
        let defaults = &self.config.defaults;
        fill(&mut request.db_url, &defaults.db_url);
        fill(&mut request.user, &defaults.user);
        fill(&mut request.password, &defaults.password);
        fill(&mut request.schema, &defaults.schema);
        request
    }
}

fn fill(slot: &mut Option<String>, default: &Option<String>) {
    if slot.as_deref().is_none_or(|v| v.trim().is_empty()) {
        slot.clone_from(default);
    }
}
