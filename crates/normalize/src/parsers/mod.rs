//! Parser front-end: language detection and tree-sitter parsing.

pub mod manager;

pub use manager::ParserManager;
