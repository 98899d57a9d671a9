//! IR cache: Moka in-memory, keyed by (file path, xxh3 content hash).
//! A changed file hashes differently, so stale entries are never served;
//! they simply age out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use moka::sync::Cache;
use xxhash_rust::xxh3::xxh3_64;

use super::FileIr;

type CacheKey = (PathBuf, u64);

/// xxh3 hash of file content.
pub fn hash_content(source: &[u8]) -> u64 {
    xxh3_64(source)
}

/// In-memory IR cache using Moka (TinyLFU admission).
pub struct IrCache {
    inner: Option<Cache<CacheKey, Arc<FileIr>>>,
}

impl IrCache {
    /// Create a cache with the given capacity. Zero disables caching.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: (capacity > 0).then(|| Cache::new(capacity)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self, path: &Path, content_hash: u64) -> Option<Arc<FileIr>> {
        self.inner
            .as_ref()?
            .get(&(path.to_path_buf(), content_hash))
    }

    pub fn insert(&self, path: &Path, content_hash: u64, ir: Arc<FileIr>) {
        if let Some(cache) = &self.inner {
            cache.insert((path.to_path_buf(), content_hash), ir);
        }
    }

    /// Approximate entry count (Moka updates it lazily).
    pub fn entry_count(&self) -> u64 {
        match &self.inner {
            Some(cache) => {
                cache.run_pending_tasks();
                cache.entry_count()
            }
            None => 0,
        }
    }

    pub fn invalidate(&self, path: &Path, content_hash: u64) {
        if let Some(cache) = &self.inner {
            cache.invalidate(&(path.to_path_buf(), content_hash));
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }
}

impl Default for IrCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}
