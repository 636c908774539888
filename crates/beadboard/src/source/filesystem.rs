//! Local filesystem loader.
//!
//! Walks each scan root looking for `.beads` marker directories, then reads
//! the `issues.jsonl` export inside each one.
//!
//! # Traversal Rules
//!
//! - Directories are visited depth-first, entries in name order, so discovery
//!   order does not depend on the filesystem.
//! - `node_modules` and every hidden directory other than `.beads` are never
//!   entered. A marker is recorded but not descended into.
//! - Directories more than `max_depth` levels below a root are not listed.
//! - Symlinks are not followed.
//! - A directory that cannot be listed is skipped; its siblings are still
//!   visited.

use super::{
    ISSUES_FILE_NAME, LoadReport, MARKER_DIR_NAME, RepositorySource, Skipped, line_skips,
    prefix_from_entries,
};
use crate::config::{DEFAULT_MAX_DEPTH, ScanConfig};
use crate::domain::{Issue, MultiRepoData, Repository};
use crate::error::{Error, Result, SkipReason};
use async_trait::async_trait;
use beadboard_jsonl::{Warning, read_jsonl_resilient};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Directory names that are never descended into
const EXCLUDED_DIRS: &[&str] = &["node_modules"];

/// Loads repositories by scanning local directory trees.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    roots: Vec<PathBuf>,
    max_depth: usize,
}

impl FilesystemSource {
    /// Create a source scanning `roots` to the default depth.
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create a source from scan configuration.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.roots.iter().cloned()).with_max_depth(config.max_depth)
    }

    /// Set how many directory levels below each root are listed.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The configured scan roots.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

#[async_trait]
impl RepositorySource for FilesystemSource {
    fn describe(&self) -> String {
        format!("filesystem scan of {} root(s)", self.roots.len())
    }

    async fn load(&self) -> Result<LoadReport> {
        let mut skipped = Vec::new();
        let mut markers: Vec<PathBuf> = Vec::new();

        for root in &self.roots {
            for marker in find_marker_directories(root, self.max_depth, &mut skipped).await {
                if markers.contains(&marker) {
                    debug!(marker = %marker.display(), "Marker reached from more than one root");
                    continue;
                }
                markers.push(marker);
            }
        }

        let mut repositories = Vec::with_capacity(markers.len());
        for marker in &markers {
            let location = marker.display().to_string();
            match load_repository(marker).await {
                Ok((repository, warnings)) => {
                    skipped.extend(line_skips(&location, warnings));
                    repositories.push(repository);
                }
                Err(reason) => {
                    warn!(marker = %location, %reason, "Skipping repository");
                    skipped.push(Skipped::new(location, reason));
                }
            }
        }

        let data = MultiRepoData::from_repositories(repositories);
        info!(
            repositories = data.repositories.len(),
            issues = data.all_issues.len(),
            skipped = skipped.len(),
            "Filesystem load complete"
        );

        Ok(LoadReport { data, skipped })
    }
}

/// Find every marker directory under `root`.
///
/// Directories that cannot be listed are recorded in `skipped`; a root that
/// cannot be listed is reported as [`SkipReason::RootUnavailable`].
pub async fn find_marker_directories(
    root: &Path,
    max_depth: usize,
    skipped: &mut Vec<Skipped>,
) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack: Vec<(PathBuf, usize)> = vec![(root.to_path_buf(), 0)];

    while let Some((dir, depth)) = stack.pop() {
        if depth > max_depth {
            continue;
        }

        let subdirs = match list_subdirectories(&dir).await {
            Ok(subdirs) => subdirs,
            Err(e) => {
                let reason = if depth == 0 {
                    SkipReason::RootUnavailable(e.to_string())
                } else {
                    SkipReason::UnreadableDirectory(e.to_string())
                };
                warn!(directory = %dir.display(), error = %e, "Cannot read directory, skipping");
                skipped.push(Skipped::new(dir.display().to_string(), reason));
                continue;
            }
        };

        let mut children = Vec::new();
        for (name, path) in subdirs {
            if name == MARKER_DIR_NAME {
                debug!(marker = %path.display(), "Found marker directory");
                found.push(path);
            } else if !is_excluded_dir(&name) {
                children.push(path);
            }
        }

        // Reverse so the stack pops children in name order.
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }

    found
}

fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name) || (name.starts_with('.') && name != MARKER_DIR_NAME)
}

/// List the immediate subdirectories of `dir`, sorted by name.
async fn list_subdirectories(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut subdirs = Vec::new();

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(directory = %dir.display(), error = %e, "Failed to read directory entry, stopping listing");
                break;
            }
        };

        let is_dir = match entry.file_type().await {
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "Cannot stat entry, skipping");
                false
            }
        };
        if is_dir {
            subdirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }

    subdirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(subdirs)
}

/// Load one repository from its marker directory.
///
/// Returns the repository together with a warning for every dropped line of
/// its issue file.
///
/// # Errors
///
/// Returns [`SkipReason::MissingIssueFile`] when the marker holds no
/// `issues.jsonl`, and [`SkipReason::UnreadableIssueFile`] when it exists but
/// cannot be read as UTF-8 text.
pub async fn load_repository(
    marker: &Path,
) -> std::result::Result<(Repository, Vec<Warning>), SkipReason> {
    let issues_path = marker.join(ISSUES_FILE_NAME);

    match fs::try_exists(&issues_path).await {
        Ok(true) => {}
        Ok(false) => return Err(SkipReason::MissingIssueFile),
        Err(e) => return Err(SkipReason::UnreadableIssueFile(e.to_string())),
    }

    let (issues, warnings) = read_jsonl_resilient::<Issue>(&issues_path)
        .await
        .map_err(|e| SkipReason::UnreadableIssueFile(Error::from(e).to_string()))?;

    let repo_path = marker.parent().unwrap_or(marker);
    let name = repo_path.file_name().map_or_else(
        || repo_path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    let prefix = read_prefix(marker, &name).await;

    debug!(
        repository = %name,
        issues = issues.len(),
        dropped_lines = warnings.len(),
        "Loaded repository"
    );

    Ok((
        Repository {
            name,
            path: repo_path.display().to_string(),
            db_path: marker.display().to_string(),
            prefix,
            issues,
        },
        warnings,
    ))
}

/// Derive the prefix from the marker's database file, falling back to `name`.
async fn read_prefix(marker: &Path, name: &str) -> String {
    let mut names = Vec::new();
    match fs::read_dir(marker).await {
        Ok(mut entries) => {
            while let Ok(Some(entry)) = entries.next_entry().await {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Err(e) => {
            debug!(marker = %marker.display(), error = %e, "Cannot list marker, using name as prefix");
        }
    }
    prefix_from_entries(names.iter().map(String::as_str), name)
}
