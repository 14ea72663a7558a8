//! Dataset Cache Module
//! Memoizes loaded record sets keyed by file path and modification time.

use crate::data::loader::{LoaderError, SerpLoader};
use crate::data::record::RecordSet;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

struct CacheEntry {
    modified: SystemTime,
    records: Arc<RecordSet>,
}

/// Cache of loaded data sets. A hit requires the file's mtime to be unchanged.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current modification time of a file, if readable.
    pub fn modified_time(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    /// Return the cached set if the file has not changed since it was loaded.
    pub fn get(&self, path: &Path) -> Option<Arc<RecordSet>> {
        let key = Self::key(path);
        let entry = self.entries.get(&key)?;
        let current = Self::modified_time(path)?;

        if current == entry.modified {
            debug!(path = %key.display(), "Dataset cache hit");
            Some(Arc::clone(&entry.records))
        } else {
            debug!(path = %key.display(), "Dataset cache stale");
            None
        }
    }

    /// Store a set loaded from `path` at modification time `modified`.
    pub fn insert(&mut self, path: &Path, modified: SystemTime, records: Arc<RecordSet>) {
        self.entries.insert(Self::key(path), CacheEntry { modified, records });
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(&Self::key(path));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached set if fresh, otherwise load synchronously and cache the result.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<RecordSet>, LoaderError> {
        if let Some(records) = self.get(path) {
            return Ok(records);
        }

        let modified = Self::modified_time(path)
            .ok_or_else(|| LoaderError::NotFound(path.display().to_string()))?;
        let records = Arc::new(SerpLoader::load_csv(path)?);
        self.insert(path, modified, Arc::clone(&records));
        info!(path = %path.display(), cached = self.len(), "Dataset cached");
        Ok(records)
    }

    fn key(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
