//! Type definitions for the collection store
//!
//! The persisted shape is deliberately loose: a document maps collection names
//! to arrays of schema-less JSON objects, and only the `id` field is reserved.

/// Document, collection and item types
pub mod document;

// Re-export commonly used types for convenience
pub use document::{Document, Item, ItemId, ID_FIELD};
