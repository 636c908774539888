//! Error types for beadboard-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for beadboard-jsonl operations.
///
/// Per-line problems never surface here; they become [`crate::Warning`]s.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while opening or reading the input.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input could not be treated as JSONL at all.
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for beadboard-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
