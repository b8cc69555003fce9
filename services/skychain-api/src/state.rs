use std::sync::Arc;

use skychain_core::Config;
use skychain_fleet::FleetService;

/// Shared handler state. Everything the handlers touch is injected here by
/// `main`; nothing is process-global.
pub struct AppState {
    pub service: Arc<FleetService>,
    pub config: Config,
}

impl AppState {
    pub fn new(service: FleetService, config: Config) -> Self {
        Self {
            service: Arc::new(service),
            config,
        }
    }

    /// Whether internal error detail may be sent to clients
    pub fn expose_internal_errors(&self) -> bool {
        self.config.is_development()
    }
}
