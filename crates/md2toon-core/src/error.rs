//! Error types for TOON decoding and JSON export.
//!
//! Classification and encoding are total and have no error channel; only
//! reading TOON back (and serializing to JSON) can fail.

use thiserror::Error;

/// Errors that can occur while decoding TOON or exporting JSON.
#[derive(Error, Debug)]
pub enum ToonError {
    /// The input string was not valid TOON.
    /// Includes the 1-based line number where the error was detected.
    #[error("TOON parse error at line {line}: {message}")]
    ToonParse { line: usize, message: String },

    /// JSON serialization of a decoded value or a prompt failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToonError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        ToonError::ToonParse {
            line,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout md2toon-core.
pub type Result<T> = std::result::Result<T, ToonError>;
