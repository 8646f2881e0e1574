//! Collection Store - a single-file JSON document store behind a REST API
//!
//! Named collections of schema-less JSON objects live in one document on disk.
//! Every operation reads the whole document, changes it in memory and writes it
//! back; the HTTP layer maps `/{collection}` and `/{collection}/{id}` onto
//! those operations.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;
pub mod types;

// Main functional modules
pub mod storage;
pub mod api;

// Re-export commonly used items for convenience
pub use crate::core::{AppState, Config, Error, Result};
pub use storage::{CollectionStore, DocumentStore, Lookup};
pub use types::{Document, Item, ItemId};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
