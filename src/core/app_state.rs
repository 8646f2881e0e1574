//! Application state shared by every request handler

use std::sync::Arc;
use crate::core::config::Config;
use crate::storage::CollectionStore;

/// Central application state holding the store and configuration
#[derive(Debug, Clone)]
pub struct AppState {
    /// Collection store backed by the configured data file
    pub store: Arc<CollectionStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState from an already initialized store
    pub fn new(store: CollectionStore, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
