//! Collection operations over the document store
//!
//! Each operation is one `read → mutate in memory → write` cycle against the
//! backing file. Reads are fail-soft: an unreadable store looks like an empty
//! one. `create` is the exception on the write side and reports write failures
//! to the caller; `update_item` and `delete_item` fold them into "not found".
//!
//! In [`WriteMode::Serialized`] every operation, reads included, runs under one
//! in-process lock, so no caller observes a half-written file.

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::core::config::{StorageConfig, WriteMode};
use crate::core::error::StoreError;
use crate::storage::{DocumentStore, Lookup};
use crate::types::document::{self, Document, Item, ItemId};

/// Collection-scoped access to a single JSON document
#[derive(Debug)]
pub struct CollectionStore {
    documents: DocumentStore,
    /// Held across every read and read-modify-write in [`WriteMode::Serialized`]
    write_lock: Option<Mutex<()>>,
}

impl CollectionStore {
    /// Wrap `documents`, coordinating mutations according to `mode`
    pub fn new(documents: DocumentStore, mode: WriteMode) -> Self {
        let write_lock = match mode {
            WriteMode::Serialized => Some(Mutex::new(())),
            WriteMode::Unguarded => None,
        };
        Self { documents, write_lock }
    }

    /// Build from the storage section of the configuration
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(DocumentStore::new(&config.data_file), config.write_mode)
    }

    /// Underlying document store
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Mutation coordination in effect
    pub fn write_mode(&self) -> WriteMode {
        match self.write_lock {
            Some(_) => WriteMode::Serialized,
            None => WriteMode::Unguarded,
        }
    }

    /// Ensure the backing file exists. See [`DocumentStore::initialize`].
    pub async fn initialize(&self) -> Result<bool, StoreError> {
        self.documents.initialize().await
    }

    /// Guard over any file access in [`WriteMode::Serialized`]
    async fn lock(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// Items of `name` with the store failure, if any, still visible
    pub async fn fetch_all(&self, name: &str) -> Lookup<Vec<Item>> {
        let _guard = self.lock().await;
        match self.documents.read_document().await {
            Ok(doc) if doc.has_collection(name) => {
                Lookup::Found(doc.items(name).cloned().collect())
            }
            Ok(_) => Lookup::Absent,
            Err(err) => Lookup::Failed(err),
        }
    }

    /// Items of `name`; empty when the collection or the store is missing
    pub async fn list_all(&self, name: &str) -> Vec<Item> {
        self.fetch_all(name).await.found().unwrap_or_default()
    }

    /// First item of `name` whose id is `id`, with store failures still visible
    pub async fn fetch_one(&self, name: &str, id: ItemId) -> Lookup<Item> {
        let _guard = self.lock().await;
        match self.documents.read_document().await {
            Ok(doc) => doc.find(name, id).cloned().into(),
            Err(err) => Lookup::Failed(err),
        }
    }

    /// First item of `name` whose id is `id`
    pub async fn get_one(&self, name: &str, id: ItemId) -> Option<Item> {
        self.fetch_one(name, id).await.found()
    }

    /// Append `payload` to `name` under the next free id and persist it.
    ///
    /// An unreadable store is treated as an empty document, so a transient
    /// read failure followed by a successful write discards the old content.
    pub async fn create(&self, name: &str, payload: Item) -> Result<Item, StoreError> {
        let _guard = self.lock().await;

        let mut doc = match self.documents.read_document().await {
            Ok(doc) => doc,
            Err(err) => {
                warn!("Creating in {:?} on top of an empty document: {}", name, err);
                Document::new()
            }
        };

        let item = doc.insert(name, payload);

        if let Err(err) = self.documents.write_document(&doc).await {
            error!("Failed to persist new item in {:?}: {}", name, err);
            return Err(err);
        }

        info!("Created item {:?} in {:?}", item.get(document::ID_FIELD), name);
        Ok(item)
    }

    /// Merge `patch` into item `id` of `name`, with store failures still visible
    pub async fn try_update(&self, name: &str, id: ItemId, patch: Item) -> Lookup<Item> {
        let _guard = self.lock().await;

        let mut doc = match self.documents.read_document().await {
            Ok(doc) => doc,
            Err(err) => return Lookup::Failed(err),
        };

        let Some(item) = doc.find_mut(name, id) else {
            debug!("No item {} in {:?} to update", id, name);
            return Lookup::Absent;
        };

        document::merge_fields(item, patch);
        let updated = item.clone();

        match self.documents.write_document(&doc).await {
            Ok(()) => {
                debug!("Updated item {} in {:?}", id, name);
                Lookup::Found(updated)
            }
            Err(err) => Lookup::Failed(err),
        }
    }

    /// Merge `patch` into item `id` of `name`; `None` if missing or on any failure
    pub async fn update_item(&self, name: &str, id: ItemId, patch: Item) -> Option<Item> {
        self.try_update(name, id, patch).await.found()
    }

    /// Remove item `id` from `name`, returning it, with store failures still visible
    pub async fn try_delete(&self, name: &str, id: ItemId) -> Lookup<Item> {
        let _guard = self.lock().await;

        let mut doc = match self.documents.read_document().await {
            Ok(doc) => doc,
            Err(err) => return Lookup::Failed(err),
        };

        let Some(removed) = doc.remove(name, id) else {
            debug!("No item {} in {:?} to delete", id, name);
            return Lookup::Absent;
        };

        match self.documents.write_document(&doc).await {
            Ok(()) => {
                debug!("Deleted item {} from {:?}", id, name);
                Lookup::Found(removed)
            }
            Err(err) => Lookup::Failed(err),
        }
    }

    /// Remove item `id` from `name`; `false` if missing or on any failure
    pub async fn delete_item(&self, name: &str, id: ItemId) -> bool {
        self.try_delete(name, id).await.found().is_some()
    }

    /// Names of the stored collections; empty if the store is unreadable
    pub async fn collection_names(&self) -> Vec<String> {
        let _guard = self.lock().await;
        match self.documents.read_document().await {
            Ok(doc) => doc.collection_names().map(str::to_string).collect(),
            Err(err) => Lookup::<Vec<String>>::Failed(err).found().unwrap_or_default(),
        }
    }
}
