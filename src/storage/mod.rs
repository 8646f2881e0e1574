//! Storage layer for the collection store
//!
//! [`DocumentStore`] owns the backing JSON file and its whole-document read and
//! write primitives. [`CollectionStore`] layers the collection operations on
//! top, including identifier assignment and the fail-soft read policy.

/// Whole-file document store
pub mod file_store;

/// Collection operations facade
pub mod collections;

/// Fail-soft operation outcome
pub mod lookup;

/// Re-export main storage types
pub use file_store::DocumentStore;
pub use collections::CollectionStore;
pub use lookup::Lookup;
