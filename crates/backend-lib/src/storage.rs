// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Keyed object store abstraction with a flat-file JSON implementation.
//!
//! Records live in an in-process cache. `save`/`remove` only touch the cache;
//! `save_all` flushes the whole set to disk and `load_all` replaces the cache
//! with what is on disk.
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs as tokio_fs;

/// Failures raised by an [`ObjectStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record not found: {0}")]
    NotFound(String),
}

/// A value that can be kept in an [`ObjectStore`]
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name used for the backing file (`.db_<NAME>.json`)
    const NAME: &'static str;

    fn id(&self) -> &str;
}

/// Filter passed to [`ObjectStore::search`]
pub type Filter<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// Trait for durable record stores
#[async_trait]
pub trait ObjectStore<T: Record>: Send + Sync {
    /// Replace the in-process view with the records on stable storage
    async fn load_all(&self) -> Result<(), StoreError>;

    /// Flush every record to stable storage
    async fn save_all(&self) -> Result<(), StoreError>;

    /// All records matching `filter`
    fn search(&self, filter: Filter<'_, T>) -> Vec<T>;

    /// Look a record up by id
    fn get(&self, id: &str) -> Option<T>;

    /// Insert or replace a record
    fn save(&self, record: T);

    /// Remove a record; fails with [`StoreError::NotFound`] if it is not present
    fn remove(&self, record: &T) -> Result<(), StoreError>;

    fn count(&self) -> usize;
}

/// Flat-file implementation of the ObjectStore trait
pub struct FileObjectStore<T> {
    path: PathBuf,
    records: RwLock<HashMap<String, T>>,
}

impl<T: Record> FileObjectStore<T> {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        Ok(Self {
            path: root.join(format!(".db_{}.json", T::NAME)),
            records: RwLock::new(HashMap::new()),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T: Record> ObjectStore<T> for FileObjectStore<T> {
    async fn load_all(&self) -> Result<(), StoreError> {
        let loaded: HashMap<String, T> = match tokio_fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(store = T::NAME, count = loaded.len(), "loaded records");
        *self.records.write() = loaded;
        Ok(())
    }

    async fn save_all(&self) -> Result<(), StoreError> {
        let (json, count) = {
            let records = self.records.read();
            (serde_json::to_string_pretty(&*records)?, records.len())
        };

        // write-then-rename so a crash never leaves a truncated file behind
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;

        tracing::debug!(store = T::NAME, count, "flushed records");
        Ok(())
    }

    fn search(&self, filter: Filter<'_, T>) -> Vec<T> {
        self.records
            .read()
            .values()
            .filter(|record| filter(record))
            .cloned()
            .collect()
    }

    fn get(&self, id: &str) -> Option<T> {
        self.records.read().get(id).cloned()
    }

    fn save(&self, record: T) {
        self.records.write().insert(record.id().to_owned(), record);
    }

    fn remove(&self, record: &T) -> Result<(), StoreError> {
        self.records
            .write()
            .remove(record.id())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(record.id().to_owned()))
    }

    fn count(&self) -> usize {
        self.records.read().len()
    }
}
