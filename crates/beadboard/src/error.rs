//! Error types for beadboard operations.
//!
//! Errors are split by how far they reach:
//!
//! - **[`Error`]**: conditions that stop a load or a command from producing
//!   any result. For loaders this is only ever an authentication failure.
//! - **[`SkipReason`]**: conditions that cost one line, one directory, or one
//!   repository. They are collected into a [`crate::source::LoadReport`] and the
//!   load carries on without the affected unit.

use beadboard_jsonl::Warning;
use std::io;
use thiserror::Error;

/// The error type for beadboard operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Reading an issue file failed as a whole.
    #[error("JSONL error: {0}")]
    Jsonl(#[from] beadboard_jsonl::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote API rejected the credential, or no usable credential was given.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The remote API answered with something other than what was asked for.
    #[error("Remote API error: {0}")]
    Remote(String),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A specialized Result type for beadboard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a unit of input contributed nothing to a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// A scan root does not exist or cannot be listed.
    #[error("scan root unavailable: {0}")]
    RootUnavailable(String),

    /// A directory below a scan root cannot be listed.
    #[error("directory unreadable: {0}")]
    UnreadableDirectory(String),

    /// The marker directory exists but has no issue file.
    #[error("marker directory has no issues.jsonl")]
    MissingIssueFile,

    /// The issue file exists but cannot be read as text.
    #[error("issue file unreadable: {0}")]
    UnreadableIssueFile(String),

    /// A remote repository has no marker directory at its root.
    #[error("no .beads directory")]
    NoMarkerDirectory,

    /// A remote request for this repository failed.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// A remote repository took longer than the configured timeout.
    #[error("timed out after {0:?}")]
    TimedOut(std::time::Duration),

    /// Listing remote repositories failed for a reason other than authentication.
    #[error("repository enumeration failed: {0}")]
    EnumerationFailed(String),

    /// One line of an issue file was dropped.
    #[error("{0}")]
    MalformedLine(Warning),
}

impl From<Error> for SkipReason {
    fn from(err: Error) -> Self {
        Self::FetchFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_errors_keep_their_message() {
        let err: Error = beadboard_jsonl::Error::InvalidFormat("bad header".to_string()).into();
        assert!(matches!(err, Error::Jsonl(_)));
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn errors_become_fetch_failures() {
        let reason = SkipReason::from(Error::Remote("503".to_string()));
        assert_eq!(reason, SkipReason::FetchFailed("Remote API error: 503".to_string()));
    }
}
