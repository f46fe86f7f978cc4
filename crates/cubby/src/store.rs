//! Path derivation, collection lifecycle, and entry operations.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{self, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// A key-value store persisting each entry as one file at
/// `<root>/<collection>/<prefix><key>.<ext>`.
///
/// Every operation is a single synchronous filesystem call; the filesystem
/// itself is the only source of truth and the only arbiter of concurrent
/// access. There are no locks, no caches, and no retries.
#[derive(Debug, Default)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Create a store without touching the filesystem. Call
    /// [`init_collections`](Self::init_collections) before use, or use
    /// [`open`](Self::open).
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create a store and eagerly provision its configured collections.
    ///
    /// # Errors
    /// Returns the first collection-creation failure.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let store = Self::new(config);
        store.init_collections()?;
        Ok(store)
    }

    /// Get the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Derive the filename for a key.
    fn file_name_for(&self, key: &str) -> String {
        format!("{}{}.{}", self.config.file_prefix, key, self.config.file_ext)
    }

    /// Path of a collection directory relative to the configured root, or of
    /// one entry file when `key` is given.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidArgument`] for an empty collection name.
    pub fn relative_path_for(&self, collection: &str, key: Option<&str>) -> Result<PathBuf> {
        ensure_collection_name(collection)?;

        let mut rel = self.config.root.join(collection);
        if let Some(key) = key {
            rel.push(self.file_name_for(key));
        }
        Ok(rel)
    }

    /// Like [`relative_path_for`](Self::relative_path_for), resolved against
    /// the process working directory. All filesystem calls go through this
    /// path.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidArgument`] for an empty collection name.
    pub fn absolute_path_for(&self, collection: &str, key: Option<&str>) -> Result<PathBuf> {
        let rel = self.relative_path_for(collection, key)?;
        Ok(path::absolute(rel)?)
    }

    /// Create the backing directory for a collection. Succeeds silently if
    /// the directory already exists.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidArgument`] for an empty name, or
    /// [`StoreError::Io`] for any filesystem failure other than "already
    /// exists".
    pub fn create_collection(&self, collection: &str) -> Result<()> {
        let dir = self.absolute_path_for(collection, None)?;
        fs::create_dir_all(&dir)?;

        debug!(collection = %collection, path = %dir.display(), "Created collection");

        Ok(())
    }

    /// Create every configured collection in order, halting on the first
    /// failure. A one-time startup step.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn init_collections(&self) -> Result<()> {
        for name in &self.config.collections {
            self.create_collection(name)?;
        }

        info!(
            root = %self.config.root.display(),
            count = self.config.collections.len(),
            "Initialized collections"
        );

        Ok(())
    }

    /// Store a value under `(collection, key)`, overwriting any existing
    /// entry. The on-disk content is exactly the codec's encoding of
    /// `value`, written in a single call.
    ///
    /// # Errors
    /// Returns [`StoreError::CollectionNotFound`] if the collection
    /// directory is missing, or [`StoreError::Io`] for any other write
    /// failure.
    pub fn put(&self, collection: &str, key: &str, value: &Value) -> Result<()> {
        ensure_collection_name(collection)?;
        ensure_key(key)?;

        let file_path = self.absolute_path_for(collection, Some(key))?;
        let raw = self.config.codec.encode(value)?;

        if let Err(error) = fs::write(&file_path, raw) {
            if error.kind() == io::ErrorKind::NotFound {
                return Err(StoreError::CollectionNotFound(collection.to_string()));
            }
            return Err(error.into());
        }

        debug!(collection = %collection, key = %key, "Put entry");

        Ok(())
    }

    /// Fetch the value stored under `(collection, key)`. Returns `Ok(None)`
    /// when no entry exists; absence is not an error.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] for any read failure other than a missing
    /// file, plus whatever the configured decode hook reports (the default
    /// lenient codec never errors).
    pub fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        ensure_collection_name(collection)?;
        ensure_key(key)?;

        let file_path = self.absolute_path_for(collection, Some(key))?;
        match fs::read(&file_path) {
            Ok(raw) => {
                debug!(collection = %collection, key = %key, "Got entry");
                Ok(Some(self.config.codec.decode(&raw)?))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Delete the entry under `(collection, key)`. Returns whether a file
    /// was actually removed; deleting a nonexistent entry is not an error.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] for any deletion failure other than a
    /// missing file.
    pub fn remove(&self, collection: &str, key: &str) -> Result<bool> {
        ensure_collection_name(collection)?;
        ensure_key(key)?;

        let file_path = self.absolute_path_for(collection, Some(key))?;
        match fs::remove_file(&file_path) {
            Ok(()) => {
                debug!(collection = %collection, key = %key, "Removed entry");
                Ok(true)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    /// Probe whether an entry exists and is readable and writable.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] for any probe failure other than a missing
    /// file (an entry whose permissions forbid access reports an error, not
    /// `false`).
    pub fn exists(&self, collection: &str, key: &str) -> Result<bool> {
        ensure_collection_name(collection)?;
        ensure_key(key)?;

        let file_path = self.absolute_path_for(collection, Some(key))?;
        match OpenOptions::new().read(true).write(true).open(&file_path) {
            Ok(_) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    /// Store any serializable value, converting it through the codec's value
    /// model first.
    ///
    /// # Errors
    /// As [`put`](Self::put), plus [`StoreError::Json`] if the value cannot
    /// be converted.
    pub fn put_as<T: Serialize>(&self, collection: &str, key: &str, value: &T) -> Result<()> {
        self.put(collection, key, &serde_json::to_value(value)?)
    }

    /// Fetch the value stored under `(collection, key)` and convert it into
    /// `T`. Conversion failures surface even under the lenient codec.
    ///
    /// # Errors
    /// As [`get`](Self::get), plus [`StoreError::Json`] if the stored value
    /// does not match `T`.
    pub fn get_as<T: DeserializeOwned>(&self, collection: &str, key: &str) -> Result<Option<T>> {
        match self.get(collection, key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

fn ensure_collection_name(collection: &str) -> Result<()> {
    if collection.is_empty() {
        return Err(StoreError::InvalidArgument("empty collection name"));
    }
    Ok(())
}

fn ensure_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidArgument("empty key"));
    }
    Ok(())
}
