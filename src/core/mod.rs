//! Core application foundations
//!
//! Configuration, error types, logging setup and the shared application state
//! handed to the HTTP layer.

/// Error types
pub mod error;

/// Application configuration
pub mod config;

/// Tracing subscriber setup
pub mod logging;

/// Application state management
pub mod app_state;

/// Factory for app creation
pub mod factory;

// Re-export commonly used items
pub use error::{Error, Result, StoreError};
pub use config::Config;
pub use app_state::AppState;
pub use factory::create_app_state;
