//! Error types for the normalization layer.
//!
//! Normalization itself never fails; these cover the edges around it
//! (reading and parsing source files, loading configuration).

pub mod config_error;
pub mod error_code;
pub mod parse_error;

pub use config_error::ConfigError;
pub use parse_error::ParseError;
