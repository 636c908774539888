//! Remote API loader.
//!
//! Enumerates every repository visible to a credential, probes each for a
//! `.beads` directory at its root, and parses the `issues.jsonl` it finds
//! there with the same per-line rule as the filesystem loader.
//!
//! The HTTP details live behind the [`ContentApi`] trait; [`GitHubClient`]
//! is the production implementation.
//!
//! # Ordering and Fault Isolation
//!
//! Repositories are probed concurrently through an ordered stream, so the
//! resulting `repositories` list follows the enumeration order no matter
//! which request finishes first. Each repository's work is its own failure
//! boundary: an error or timeout turns into a [`Skipped`] entry and never
//! cancels the siblings.

mod github;

pub use github::{AccessToken, GitHubClient};

use super::{
    ISSUES_FILE_NAME, LoadReport, MARKER_DIR_NAME, RepositorySource, Skipped, line_skips,
    prefix_from_entries,
};
use crate::config::{DEFAULT_CONCURRENCY, RemoteConfig};
use crate::domain::{Issue, MultiRepoData, Repository};
use crate::error::{Error, Result, SkipReason};
use async_trait::async_trait;
use beadboard_jsonl::{Warning, parse_jsonl_resilient};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, warn};

/// A repository as reported by the remote enumeration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    /// Owning account
    pub owner: String,

    /// Repository name
    pub name: String,

    /// Web URL of the repository
    pub html_url: String,
}

impl RemoteRepository {
    /// `owner/name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// The subset of a hosted source-control API the remote loader needs.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// List every repository the credential can see, most recently updated first.
    ///
    /// # Errors
    ///
    /// Must return [`Error::Unauthorized`] when the credential is rejected.
    async fn list_repositories(&self) -> Result<Vec<RemoteRepository>>;

    /// Names of the entries in a directory, or `None` if the path is not a directory.
    async fn list_directory(
        &self,
        repo: &RemoteRepository,
        path: &str,
    ) -> Result<Option<Vec<String>>>;

    /// Decoded text of a file, or `None` if the file does not exist.
    async fn fetch_text(&self, repo: &RemoteRepository, path: &str) -> Result<Option<String>>;
}

/// Loads repositories through a [`ContentApi`].
#[derive(Debug, Clone)]
pub struct RemoteSource<C> {
    api: C,
    concurrency: usize,
    timeout: Option<Duration>,
}

impl<C: ContentApi> RemoteSource<C> {
    /// Create a source with default concurrency and no timeout.
    pub fn new(api: C) -> Self {
        Self {
            api,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
        }
    }

    /// Create a source from remote configuration.
    pub fn from_config(api: C, config: &RemoteConfig) -> Self {
        let source = Self::new(api).with_concurrency(config.concurrency);
        match config.timeout() {
            Some(timeout) => source.with_timeout(timeout),
            None => source,
        }
    }

    /// Set how many repositories are probed at once (at least one).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Give up on a repository after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn load_within_timeout(
        &self,
        repo: &RemoteRepository,
    ) -> std::result::Result<(Repository, Vec<Warning>), SkipReason> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.load_repository(repo))
                .await
                .unwrap_or(Err(SkipReason::TimedOut(limit))),
            None => self.load_repository(repo).await,
        }
    }

    async fn load_repository(
        &self,
        repo: &RemoteRepository,
    ) -> std::result::Result<(Repository, Vec<Warning>), SkipReason> {
        let entries = self
            .api
            .list_directory(repo, MARKER_DIR_NAME)
            .await?
            .ok_or(SkipReason::NoMarkerDirectory)?;

        if !entries.iter().any(|name| name == ISSUES_FILE_NAME) {
            return Err(SkipReason::MissingIssueFile);
        }

        let issues_path = format!("{MARKER_DIR_NAME}/{ISSUES_FILE_NAME}");
        let content = self
            .api
            .fetch_text(repo, &issues_path)
            .await?
            .ok_or(SkipReason::MissingIssueFile)?;

        let (issues, warnings) = parse_jsonl_resilient::<Issue>(&content);
        let prefix = prefix_from_entries(entries.iter().map(String::as_str), &repo.name);

        debug!(
            repository = %repo.full_name(),
            issues = issues.len(),
            dropped_lines = warnings.len(),
            "Loaded remote repository"
        );

        Ok((
            Repository {
                name: repo.name.clone(),
                path: repo.html_url.clone(),
                db_path: format!("{}/{MARKER_DIR_NAME}", repo.html_url),
                prefix,
                issues,
            },
            warnings,
        ))
    }
}

#[async_trait]
impl<C: ContentApi> RepositorySource for RemoteSource<C> {
    fn describe(&self) -> String {
        "remote repository API".to_string()
    }

    async fn load(&self) -> Result<LoadReport> {
        let remote_repos = match self.api.list_repositories().await {
            Ok(repos) => repos,
            Err(Error::Unauthorized(message)) => return Err(Error::Unauthorized(message)),
            Err(e) => {
                warn!(error = %e, "Repository enumeration failed");
                return Ok(LoadReport {
                    data: MultiRepoData::default(),
                    skipped: vec![Skipped::new(
                        self.describe(),
                        SkipReason::EnumerationFailed(e.to_string()),
                    )],
                });
            }
        };
        debug!(count = remote_repos.len(), "Enumerated remote repositories");

        // `buffered` yields in input order regardless of completion order.
        let pending: Vec<_> = remote_repos
            .iter()
            .map(|repo| self.load_within_timeout(repo))
            .collect();
        let outcomes: Vec<_> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut repositories = Vec::new();
        let mut skipped = Vec::new();
        for (remote, outcome) in remote_repos.iter().zip(outcomes) {
            let location = remote.full_name();
            match outcome {
                Ok((repository, warnings)) => {
                    skipped.extend(line_skips(&location, warnings));
                    repositories.push(repository);
                }
                Err(SkipReason::NoMarkerDirectory) => {
                    debug!(repository = %location, "No marker directory");
                    skipped.push(Skipped::new(location, SkipReason::NoMarkerDirectory));
                }
                Err(reason) => {
                    warn!(repository = %location, %reason, "Skipping remote repository");
                    skipped.push(Skipped::new(location, reason));
                }
            }
        }

        let data = MultiRepoData::from_repositories(repositories);
        info!(
            repositories = data.repositories.len(),
            issues = data.all_issues.len(),
            skipped = skipped.len(),
            "Remote load complete"
        );

        Ok(LoadReport { data, skipped })
    }
}
