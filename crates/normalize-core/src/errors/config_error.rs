//! Configuration loading errors.

use std::path::PathBuf;

use super::error_code::{self, DriftErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid config value for `{field}`: {message}")]
    Invalid { field: String, message: String },
}

impl DriftErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => error_code::IO_ERROR,
            Self::TomlParse(_) => error_code::CONFIG_PARSE_ERROR,
            Self::Invalid { .. } => error_code::CONFIG_INVALID,
        }
    }
}
