//! Shared handler state

use relay_application::{CompletionGateway, RelayParams};
use std::sync::Arc;

/// State cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn CompletionGateway>,
    pub params: Arc<RelayParams>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn CompletionGateway>, params: RelayParams) -> Self {
        Self {
            gateway,
            params: Arc::new(params),
        }
    }
}
