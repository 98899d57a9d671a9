//! Normalizer limits and strict mode.

use serde::{Deserialize, Serialize};

/// Limits applied by every language normalizer during a single file pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Walker iterations before a chain is abandoned.
    pub max_chain_depth: usize,
    /// Nesting depth of literal arguments before they degrade to `unknown`.
    pub max_arg_depth: usize,
    /// Node depth below which the declaration and chain-discovery walks stop.
    pub max_tree_depth: usize,
    /// Nesting of named scopes (modules, types, functions) below which
    /// nested declarations are skipped.
    pub max_scope_depth: usize,
    /// Log files that needed any fallback at `warn` level.
    pub strict: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: 256,
            max_arg_depth: 32,
            max_tree_depth: 512,
            max_scope_depth: 64,
            strict: false,
        }
    }
}
