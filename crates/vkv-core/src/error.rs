//! Error types for VKV parsing, writing and typed mapping.

use thiserror::Error;

/// Errors that can occur while reading, writing or mapping KeyValues data.
#[derive(Error, Debug)]
pub enum VkvError {
    /// The input was not well-formed KeyValues text.
    /// Includes the 1-based line number where the error was detected.
    #[error("VKV parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A node tree could not be converted to (or from) the requested type.
    #[error("VKV mapping error: {0}")]
    Mapping(String),

    /// A positional write on a group named a child that does not exist.
    #[error("index {index} is out of range for a group of {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    /// The underlying reader or writer failed (includes invalid UTF-8 input).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON bridge could not parse or produce JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VkvError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        VkvError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn mapping(message: impl Into<String>) -> Self {
        VkvError::Mapping(message.into())
    }
}

/// Convenience alias used throughout vkv-core.
pub type Result<T> = std::result::Result<T, VkvError>;
