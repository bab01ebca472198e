//! Error types for vecprobe

use thiserror::Error;

use crate::config::VectorType;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors. Numeric divergences are verdicts, not errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown test case: {0}")]
    UnknownCase(u32),

    #[error("Test case {case} is not defined for {vector}")]
    Unsupported { case: u32, vector: VectorType },

    #[error("Invalid vector type: {0}")]
    InvalidVectorType(String),

    #[error("Invalid index list: {0}")]
    InvalidIndexes(String),

    #[error("Test case {case} needs {expected} indexes, found {found}")]
    IndexCount {
        case: u32,
        expected: usize,
        found: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
