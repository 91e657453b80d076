//! Process-wide cache of cleaned datasets, keyed by source path.

use super::cleaner::{CleanedDataset, CleaningOptions, DataCleaner};
use super::loader::{DataLoader, LoaderError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoaderError,
    },
}

/// Loads each snapshot at most once and hands out shared, read-only copies.
#[derive(Default)]
pub struct DatasetStore {
    entries: RwLock<HashMap<PathBuf, Arc<CleanedDataset>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store shared by the whole process.
    pub fn global() -> &'static DatasetStore {
        static STORE: OnceLock<DatasetStore> = OnceLock::new();
        STORE.get_or_init(DatasetStore::new)
    }

    /// Return the cleaned dataset for `path`, loading it on first access.
    ///
    /// Entries are never invalidated; `options` only apply to the first load.
    pub fn get_or_load(
        &self,
        path: &Path,
        options: &CleaningOptions,
    ) -> Result<Arc<CleanedDataset>, StoreError> {
        let key = Self::cache_key(path);

        if let Some(dataset) = self.entries.read().get(&key) {
            debug!(path = %key.display(), "Dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        let mut entries = self.entries.write();
        // Another caller may have filled the slot while we waited
        if let Some(dataset) = entries.get(&key) {
            return Ok(Arc::clone(dataset));
        }

        let records = DataLoader::load_raw(path).map_err(|source| StoreError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Arc::new(DataCleaner::new(options.clone()).clean(path, &records));
        info!(path = %key.display(), products = dataset.len(), "Cached cleaned dataset");

        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().contains_key(&Self::cache_key(path))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn cache_key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }
}
