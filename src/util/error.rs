//! Error types for the MDX/MDL codec.

use std::path::PathBuf;
use thiserror::Error;

use super::Tag;

/// Main error type for model loading and saving.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// First four bytes are not `MDLX`
    #[error("Invalid MDX file: wrong magic number {0}")]
    WrongMagic(Tag),

    /// Binary data ended in the middle of a value
    #[error("Unexpected end of data at offset {0}")]
    UnexpectedEof(usize),

    /// Chunk or record layout does not add up
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// A recognized block contains a keyword it does not own
    #[error("Unknown token in {block}: {token}")]
    UnknownToken { block: String, token: String },

    /// A top-level keyword that no block kind claims
    #[error("Unsupported block: {0}")]
    UnsupportedBlock(String),

    /// A token that should have been a number
    #[error("Invalid number {token:?} at line {line}")]
    InvalidNumber { token: String, line: usize },

    /// Text ended while a value or block was still expected
    #[error("Unexpected end of input at line {0}")]
    UnexpectedEnd(usize),

    /// A specific token was required but something else was found
    #[error("Expected {expected:?} at line {line}, got {actual:?}")]
    UnexpectedToken {
        expected: String,
        actual: String,
        line: usize,
    },

    /// Timeline tag not present in the animation registry
    #[error("Unknown animation tag: {0}")]
    UnknownAnimation(Tag),

    /// Object cannot be written in its current state
    #[error("Invalid object state: {0}")]
    InvalidState(String),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create an unknown token error for the named block.
    pub fn unknown_token(block: impl Into<String>, token: impl Into<String>) -> Self {
        Self::UnknownToken {
            block: block.into(),
            token: token.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// True for malformed input; false for failures of the underlying stream or file.
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            Self::Io(_) | Self::FileNotFound(_) | Self::MmapFailed(_) | Self::Settings(_)
        )
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
