//! The unified IR shared by all language normalizers.

pub mod types;

pub use types::*;
