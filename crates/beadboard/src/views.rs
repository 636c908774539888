//! The JSON shapes handed to callers.
//!
//! Each view is a pure function of a [`MultiRepoData`]. Field names are
//! camelCase on the wire.

use crate::aggregate::{IssueFilter, RepositoryIndex, TaggedIssue, filter_issues};
use crate::domain::{IssueStatus, MultiRepoData, Repository};
use crate::graph::{DependencyGraph, build_dependency_graph};
use crate::metrics::{Metrics, calculate_metrics};
use serde::Serialize;

/// One row of the repositories listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary<'a> {
    /// Repository name
    pub name: &'a str,
    /// Repository location
    pub path: &'a str,
    /// Display prefix
    pub prefix: &'a str,
    /// Number of issues
    pub issue_count: usize,
    /// Open issues
    pub open_count: usize,
    /// In-progress issues
    pub in_progress_count: usize,
    /// Closed issues
    pub closed_count: usize,
}

impl<'a> From<&'a Repository> for RepositorySummary<'a> {
    fn from(repo: &'a Repository) -> Self {
        Self {
            name: &repo.name,
            path: &repo.path,
            prefix: &repo.prefix,
            issue_count: repo.issues.len(),
            open_count: repo.count_status(IssueStatus::Open),
            in_progress_count: repo.count_status(IssueStatus::InProgress),
            closed_count: repo.count_status(IssueStatus::Closed),
        }
    }
}

/// Repositories listing with aggregate totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoriesView<'a> {
    /// One summary per repository, in load order
    pub repositories: Vec<RepositorySummary<'a>>,
    /// Number of repositories
    pub total_repos: usize,
    /// Number of issues across all repositories
    pub total_issues: usize,
    /// Open issues across all repositories
    pub total_open: usize,
    /// In-progress issues across all repositories
    pub total_in_progress: usize,
    /// Closed issues across all repositories
    pub total_closed: usize,
}

impl<'a> RepositoriesView<'a> {
    /// Summarize every repository
    #[must_use]
    pub fn new(data: &'a MultiRepoData) -> Self {
        Self {
            repositories: data.repositories.iter().map(RepositorySummary::from).collect(),
            total_repos: data.repositories.len(),
            total_issues: data.all_issues.len(),
            total_open: data.total_open,
            total_in_progress: data.total_in_progress,
            total_closed: data.total_closed,
        }
    }
}

/// Filtered issue listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuesView<'a> {
    /// Matching issues, each tagged with its repository
    pub issues: Vec<TaggedIssue<'a>>,
    /// Number of matching issues
    pub count: usize,
}

impl<'a> IssuesView<'a> {
    /// Apply `filter` to the aggregate
    #[must_use]
    pub fn new(data: &'a MultiRepoData, filter: &IssueFilter) -> Self {
        let issues = filter_issues(data, filter);
        Self {
            count: issues.len(),
            issues,
        }
    }
}

/// Graph of one repository's issues, or of every issue.
///
/// A `repo` that names no loaded repository does not narrow the graph.
#[must_use]
pub fn graph_view(data: &MultiRepoData, repo: Option<&str>) -> DependencyGraph {
    let index = RepositoryIndex::build(data);
    match repo.and_then(|name| data.repository(name)) {
        Some(repository) => build_dependency_graph(&repository.issues, &index),
        None => build_dependency_graph(&data.all_issues, &index),
    }
}

/// Metrics for one repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryMetrics<'a> {
    /// Repository name
    pub name: &'a str,
    /// Metrics over the repository's own issues
    pub metrics: Metrics,
}

/// Overall and per-repository metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsView<'a> {
    /// Metrics over every issue
    pub overall: Metrics,
    /// Metrics per repository, in load order
    pub by_repo: Vec<RepositoryMetrics<'a>>,
    /// Number of repositories
    pub repositories: usize,
}

impl<'a> MetricsView<'a> {
    /// Compute overall and per-repository metrics.
    ///
    /// Per-repository readiness only sees that repository's issues.
    #[must_use]
    pub fn new(data: &'a MultiRepoData) -> Self {
        Self {
            overall: calculate_metrics(&data.all_issues),
            by_repo: data
                .repositories
                .iter()
                .map(|repo| RepositoryMetrics {
                    name: &repo.name,
                    metrics: calculate_metrics(&repo.issues),
                })
                .collect(),
            repositories: data.repositories.len(),
        }
    }
}
