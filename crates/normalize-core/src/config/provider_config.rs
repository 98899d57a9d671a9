//! Unified provider configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the project-wide provider (file discovery, caching, parallelism).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    /// IR cache capacity in files. Default: 10_000. 0 disables the cache.
    pub cache_capacity: Option<u64>,
    /// Maximum file size in bytes. Default: 1MB (1_048_576).
    pub max_file_size: Option<u64>,
    /// Number of threads. 0 = rayon's default pool.
    pub threads: Option<usize>,
    /// Enabled language names (`rust`, `typescript`, `javascript`, `python`).
    /// Empty means every supported language.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Additional ignore patterns beyond .gitignore/.driftignore.
    #[serde(default)]
    pub extra_ignore: Vec<String>,
    /// Follow symbolic links during discovery. Default: false.
    pub follow_symlinks: Option<bool>,
}

impl ProviderConfig {
    /// Returns the effective cache capacity, defaulting to 10_000 entries.
    pub fn effective_cache_capacity(&self) -> u64 {
        self.cache_capacity.unwrap_or(10_000)
    }

    /// Returns the effective max file size, defaulting to 1MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1_048_576)
    }

    /// Returns the effective thread count, defaulting to 0 (rayon default).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }
}
