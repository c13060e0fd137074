//! Application State
//!
//! Shared handles for request handlers: the engine, the identity gateway and
//! the loaded configuration.

use std::sync::Arc;

use walkin_core::{AssignmentEngine, EventBroadcaster, IdentityGateway};
use walkin_types::WalkinConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub engine: AssignmentEngine,
    pub gateway: Arc<dyn IdentityGateway>,
    pub config: WalkinConfig,
}

impl AppState {
    pub fn new(
        engine: AssignmentEngine,
        gateway: Arc<dyn IdentityGateway>,
        config: WalkinConfig,
    ) -> Self {
        Self { inner: Arc::new(AppStateInner { engine, gateway, config }) }
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.inner.engine
    }

    pub fn gateway(&self) -> &Arc<dyn IdentityGateway> {
        &self.inner.gateway
    }

    pub fn events(&self) -> &Arc<EventBroadcaster> {
        self.inner.engine.events()
    }

    pub fn config(&self) -> &WalkinConfig {
        &self.inner.config
    }
}
