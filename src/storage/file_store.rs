//! Whole-file document store
//!
//! Owns the physical encoding of the [`Document`]: one pretty-printed JSON
//! object per file, read and rewritten in full on every access. There is no
//! cache and no partial-write protection; a crash during `write_document` can
//! leave the file truncated.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, trace};

use crate::core::error::StoreError;
use crate::types::Document;

/// Encoding written when the backing file is first created
const EMPTY_DOCUMENT: &[u8] = b"{}";

/// Handle on the JSON file backing a [`Document`]
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    /// Create a handle for `path`; nothing is touched on disk until [`initialize`](Self::initialize)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the backing file exists, creating it as `{}` if it does not.
    ///
    /// Existing content is never touched, even when it is not valid JSON.
    /// Returns `true` when the file was created by this call.
    pub async fn initialize(&self) -> Result<bool, StoreError> {
        let created = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await;

        match created {
            Ok(mut file) => {
                file.write_all(EMPTY_DOCUMENT)
                    .await
                    .map_err(|source| self.create_error(source))?;
                file.flush().await.map_err(|source| self.create_error(source))?;
                info!("Created empty document at {:?}", self.path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("Document {:?} already exists, leaving it untouched", self.path);
                Ok(false)
            }
            Err(source) => Err(self.create_error(source)),
        }
    }

    /// Read and decode the whole backing file
    pub async fn read_document(&self) -> Result<Document, StoreError> {
        trace!("Reading document {:?}", self.path);
        let bytes = fs::read(&self.path).await.map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Encode `doc` as indented JSON and overwrite the backing file
    pub async fn write_document(&self, doc: &Document) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(doc).map_err(StoreError::Encode)?;
        fs::write(&self.path, &encoded).await.map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        trace!("Wrote {} bytes to {:?}", encoded.len(), self.path);
        Ok(())
    }

    fn create_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Create {
            path: self.path.clone(),
            source,
        }
    }
}
