//! Error types for the collection store
//!
//! The document store reports failures as [`StoreError`]; everything above it
//! (configuration, bootstrap, HTTP glue) folds into the top-level [`Error`].

use std::path::PathBuf;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the collection store
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the backing file
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be created during initialization
    #[error("cannot create {path:?}: {source}")]
    Create {
        /// Backing file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The backing file could not be read (missing, unreadable)
    #[error("cannot read {path:?}: {source}")]
    Read {
        /// Backing file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The backing file could not be overwritten
    #[error("cannot write {path:?}: {source}")]
    Write {
        /// Backing file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The backing file does not hold a valid document
    #[error("corrupt document in {path:?}: {source}")]
    Corrupt {
        /// Backing file path
        path: PathBuf,
        /// Decoder error
        source: serde_json::Error,
    },

    /// The in-memory document could not be encoded
    #[error("cannot encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// True when the failure happened before anything was written
    pub fn is_read_side(&self) -> bool {
        matches!(self, StoreError::Read { .. } | StoreError::Corrupt { .. })
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
