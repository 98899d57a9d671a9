//! # drift-normalize
//!
//! Unified call-chain normalization for the Drift analysis layer.
//! Per-language normalizers turn tree-sitter trees into one IR of call
//! chains, functions, classes, imports, and exports; the provider runs
//! them across a project with caching and parallel discovery.

pub mod language;
pub mod normalizers;
pub mod parsers;
pub mod provider;
pub mod syntax;
pub mod unified;

pub use language::Language;
pub use normalizers::{create_all_normalizers, normalizer_for, LanguageNormalizer, NormalizeScope};
pub use parsers::ParserManager;
pub use provider::{FileIr, ProjectIr, ProjectStats, UnifiedProvider};
pub use syntax::SyntaxNode;
pub use unified::*;
