//! Application Factory
//!
//! Builds the [`AppState`] from configuration. Initializing the backing file is
//! part of construction, so a store that cannot be created never reaches the
//! HTTP layer.

use tracing::info;

use crate::core::app_state::AppState;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::storage::CollectionStore;

/// Create AppState based on configuration
///
/// # Errors
///
/// Returns [`Error::Storage`](crate::core::Error::Storage) when the backing
/// file does not exist and cannot be created. Callers treat this as fatal.
pub async fn create_app_state(config: Config) -> Result<AppState> {
    let store = CollectionStore::from_config(&config.storage);
    info!(
        "Opening document {:?} (write mode: {:?})",
        store.documents().path(),
        store.write_mode()
    );

    if store.initialize().await? {
        info!("Initialized new document store");
    }

    Ok(AppState::new(store, config))
}
