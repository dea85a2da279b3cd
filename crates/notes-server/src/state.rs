//! State handed to every handler and extractor.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::NotesService;

/// Shared handler state: the notes service and the configuration it was
/// built from. Cloning is two reference-count bumps.
#[derive(Clone)]
pub struct AppState {
    service: Arc<NotesService>,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(service: NotesService, config: ServerConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }

    /// The service every notes route delegates to.
    pub fn service(&self) -> &NotesService {
        &self.service
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("api_prefix", &self.config.api_prefix)
            .finish()
    }
}
