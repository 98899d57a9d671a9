//! Errors raised before normalization starts: reading and parsing a file.

use std::path::PathBuf;

use super::error_code::{self, DriftErrorCode};

/// Errors that can occur while turning a file into a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unsupported language for extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Grammar not available for {language}")]
    GrammarNotFound { language: String },

    #[error("tree-sitter failed on {}: {message}", path.display())]
    TreeSitterError { path: PathBuf, message: String },

    #[error("File too large: {} is {size} bytes (limit {limit})", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Whether the file was never a candidate (as opposed to a real failure).
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLanguage { .. } | Self::FileTooLarge { .. }
        )
    }
}

impl DriftErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => error_code::UNSUPPORTED_LANGUAGE,
            Self::GrammarNotFound { .. } => error_code::GRAMMAR_NOT_FOUND,
            Self::TreeSitterError { .. } => error_code::PARSE_FAILED,
            Self::FileTooLarge { .. } => error_code::FILE_TOO_LARGE,
            Self::Io { .. } => error_code::IO_ERROR,
        }
    }
}
