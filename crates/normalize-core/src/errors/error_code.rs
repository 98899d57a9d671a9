//! Stable error codes surfaced to the CLI/CI layers.

/// Maps an error to a stable, machine-readable code.
pub trait DriftErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const GRAMMAR_NOT_FOUND: &str = "GRAMMAR_NOT_FOUND";
pub const PARSE_FAILED: &str = "PARSE_FAILED";
pub const FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
pub const IO_ERROR: &str = "IO_ERROR";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
