//! Per-call normalization state.

use drift_normalize_core::NormalizerConfig;

use crate::unified::FallbackStats;

/// State owned by one normalization call. Created fresh for every file and
/// dropped when the call returns; normalizers hold no other mutable state.
#[derive(Debug)]
pub struct NormalizeScope<'a> {
    pub file: &'a str,
    pub config: &'a NormalizerConfig,
    pub stats: FallbackStats,
}

impl<'a> NormalizeScope<'a> {
    pub fn new(file: &'a str, config: &'a NormalizerConfig) -> Self {
        Self {
            file,
            config,
            stats: FallbackStats::default(),
        }
    }

    /// Whether a recursive walk may go one level deeper. Counts a truncated
    /// subtree when it may not.
    pub fn enter(&mut self, depth: usize) -> bool {
        if depth > self.config.max_tree_depth {
            self.stats.truncated_subtrees += 1;
            tracing::trace!(file = self.file, depth, "tree depth limit reached, subtree skipped");
            return false;
        }
        true
    }

    /// Whether declarations nested `nesting` named scopes deep are still
    /// extracted. Counts a truncated subtree when they are not.
    pub fn enter_scope(&mut self, nesting: usize) -> bool {
        if nesting > self.config.max_scope_depth {
            self.stats.truncated_subtrees += 1;
            tracing::trace!(file = self.file, nesting, "scope nesting limit reached, declarations skipped");
            return false;
        }
        true
    }
}
