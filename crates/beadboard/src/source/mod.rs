//! Repository sources: where issue exports are loaded from.
//!
//! Two interchangeable loaders produce the same [`MultiRepoData`]:
//!
//! - [`filesystem::FilesystemSource`] walks local directory trees looking for
//!   `.beads` marker directories.
//! - [`remote::RemoteSource`] asks a hosted source-control API for the same
//!   marker in every repository the credential can see.
//!
//! Callers pick exactly one per invocation and hold it as a
//! `Box<dyn RepositorySource>`. Everything downstream (filters, graph,
//! metrics) sees only the aggregate and never knows which loader ran.
//!
//! # Fault Isolation
//!
//! Faults are contained at the smallest unit they affect. A bad line drops
//! the line, a bad repository drops the repository, a bad root drops the
//! root. Each drop is recorded as a [`Skipped`] entry in the [`LoadReport`]
//! so callers and tests can see exactly what was left out and why.

use crate::domain::MultiRepoData;
use crate::error::{Result, SkipReason};
use async_trait::async_trait;
use std::fmt;

pub mod filesystem;
pub mod remote;

/// Name of the marker directory identifying a participating repository
pub const MARKER_DIR_NAME: &str = ".beads";

/// Name of the issue export inside the marker directory
pub const ISSUES_FILE_NAME: &str = "issues.jsonl";

/// Extension of the database file whose stem gives the repository prefix
pub const DB_FILE_EXTENSION: &str = ".db";

/// Database file name that never carries a prefix
pub const DEFAULT_DB_FILE_NAME: &str = "beads.db";

/// A place repositories can be loaded from.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Short human-readable description of the source, for logs.
    fn describe(&self) -> String;

    /// Discover and load every repository.
    ///
    /// # Errors
    ///
    /// Only authentication failures are returned as errors. Every other
    /// fault is recorded in [`LoadReport::skipped`].
    async fn load(&self) -> Result<LoadReport>;
}

/// A unit of input that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Path, URL, or repository name of the skipped unit
    pub location: String,

    /// What went wrong
    pub reason: SkipReason,
}

impl Skipped {
    /// Create a new skip record
    pub fn new(location: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            location: location.into(),
            reason,
        }
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// The result of a load: the aggregate plus everything left out of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// The aggregated repositories
    pub data: MultiRepoData,

    /// Skipped lines, directories, repositories, and roots, in discovery order
    pub skipped: Vec<Skipped>,
}

impl LoadReport {
    /// Skips whose reason matches the predicate
    pub fn skipped_where<'a>(
        &'a self,
        predicate: impl Fn(&SkipReason) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Skipped> + 'a {
        self.skipped.iter().filter(move |s| predicate(&s.reason))
    }
}

/// Derive a repository prefix from the names inside its marker directory.
///
/// The first `*.db` name (in sorted order) other than `beads.db` gives the
/// prefix, minus its extension. Without one the repository name is used.
pub(crate) fn prefix_from_entries<'a>(
    entries: impl IntoIterator<Item = &'a str>,
    fallback: &str,
) -> String {
    let mut candidates: Vec<&str> = entries
        .into_iter()
        .filter(|name| name.ends_with(DB_FILE_EXTENSION) && *name != DEFAULT_DB_FILE_NAME)
        .collect();
    candidates.sort_unstable();

    candidates
        .first()
        .and_then(|name| name.strip_suffix(DB_FILE_EXTENSION))
        .map_or_else(|| fallback.to_string(), str::to_string)
}

/// Record every dropped line of an issue file.
pub(crate) fn line_skips(
    location: &str,
    warnings: Vec<beadboard_jsonl::Warning>,
) -> impl Iterator<Item = Skipped> + '_ {
    warnings
        .into_iter()
        .map(move |w| Skipped::new(location, SkipReason::MalformedLine(w)))
}
