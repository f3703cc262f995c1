// Application state module
// Everything a request handler needs, shared behind an Arc

use super::types::Config;
use crate::store::SharedStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(config: Config, store: SharedStore) -> Self {
        Self { config, store }
    }
}
