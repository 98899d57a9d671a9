//! # drift-normalize-core
//!
//! Foundation crate for the Drift normalization layer.
//! Defines errors, error codes, config, tracing setup, and shared collections.
//! The normalizer crate depends on this; it has no parser dependency itself.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{DriftConfig, NormalizerConfig, ProviderConfig};
pub use errors::error_code::DriftErrorCode;
pub use errors::{ConfigError, ParseError};
pub use types::collections::{FxHashMap, FxHashSet};
