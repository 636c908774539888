//! Domain types for aggregated issue data.
//!
//! These mirror the records a beads export writes to `.beads/issues.jsonl`,
//! plus the per-repository and cross-repository aggregates built on top of
//! them. Everything here is plain data: loaders construct it, the analysis
//! modules only read it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for an issue
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub String);

impl IssueId {
    /// Create a new issue ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for IssueId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IssueId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One unit of work, as exported by the issue tracker.
///
/// Timestamps are kept exactly as the source wrote them. Fields this type
/// does not model (labels, compaction metadata, ...) are carried in
/// [`Issue::extra`] so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier for the issue
    pub id: IssueId,

    /// Issue title
    pub title: String,

    /// Issue description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Additional notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Current status
    pub status: IssueStatus,

    /// Priority level (0 = highest). Values outside 0-4 are kept as-is.
    pub priority: i64,

    /// Issue type
    pub issue_type: IssueType,

    /// Assignee (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Creation timestamp, kept verbatim
    #[serde(default)]
    pub created_at: String,

    /// Last update timestamp, kept verbatim
    #[serde(default)]
    pub updated_at: String,

    /// Closed timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,

    /// Dependencies on other issues, in source order
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub dependencies: Vec<Dependency>,

    /// Acceptance criteria (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<String>,

    /// Design notes (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,

    /// External reference (e.g., GitHub issue number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,

    /// Source fields not modeled above, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Dependency>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Dependency>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Issue {
    /// Iterate over this issue's `blocks` dependencies
    pub fn blocking_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies
            .iter()
            .filter(|dep| dep.dep_type == DependencyType::Blocks)
    }
}

/// Status of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Not started
    Open,

    /// Currently being worked on
    InProgress,

    /// Waiting on something outside the tracker
    Blocked,

    /// Completed
    Closed,
}

impl IssueStatus {
    /// The wire spelling of this status
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// General task
    Task,

    /// New feature
    Feature,

    /// Epic (parent issue)
    Epic,

    /// Bug fix
    Bug,

    /// Maintenance work
    Chore,
}

impl IssueType {
    /// The wire spelling of this type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Feature => "feature",
            Self::Epic => "epic",
            Self::Bug => "bug",
            Self::Chore => "chore",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relationship: `issue_id` depends on `depends_on_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// The dependent issue (the one that has the dependency)
    pub issue_id: IssueId,

    /// The issue depended upon. May name an issue that is not loaded.
    pub depends_on_id: IssueId,

    /// Type of dependency
    #[serde(rename = "type")]
    pub dep_type: DependencyType,

    /// When the dependency was recorded
    #[serde(default)]
    pub created_at: String,

    /// Who recorded the dependency
    #[serde(default)]
    pub created_by: String,
}

/// Type of dependency relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    /// Hard blocker - the only type that affects readiness
    Blocks,

    /// Soft link - informational
    Related,

    /// Hierarchical - epic to task
    ParentChild,

    /// Found during work
    DiscoveredFrom,
}

impl DependencyType {
    /// The wire spelling of this dependency type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Related => "related",
            Self::ParentChild => "parent-child",
            Self::DiscoveredFrom => "discovered-from",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source tree's issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Repository name (directory base name or hosted repository name)
    pub name: String,

    /// Location of the repository (local path or web URL)
    pub path: String,

    /// Location of the marker directory inside the repository
    pub db_path: String,

    /// Short display identifier, not guaranteed unique
    pub prefix: String,

    /// Issues in file order
    pub issues: Vec<Issue>,
}

impl Repository {
    /// Number of issues in this repository with the given status
    #[must_use]
    pub fn count_status(&self, status: IssueStatus) -> usize {
        count_status(&self.issues, status)
    }
}

/// The aggregate every loader returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiRepoData {
    /// Repositories in load order
    pub repositories: Vec<Repository>,

    /// Every repository's issues, in repository order then file order
    pub all_issues: Vec<Issue>,

    /// Number of open issues across all repositories
    pub total_open: usize,

    /// Number of in-progress issues across all repositories
    pub total_in_progress: usize,

    /// Number of closed issues across all repositories
    pub total_closed: usize,
}

impl MultiRepoData {
    /// Build the aggregate from repositories in load order.
    #[must_use]
    pub fn from_repositories(repositories: Vec<Repository>) -> Self {
        let all_issues: Vec<Issue> = repositories
            .iter()
            .flat_map(|repo| repo.issues.iter().cloned())
            .collect();

        Self {
            total_open: count_status(&all_issues, IssueStatus::Open),
            total_in_progress: count_status(&all_issues, IssueStatus::InProgress),
            total_closed: count_status(&all_issues, IssueStatus::Closed),
            repositories,
            all_issues,
        }
    }

    /// Find a repository by name (first match in load order)
    #[must_use]
    pub fn repository(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|repo| repo.name == name)
    }
}

fn count_status(issues: &[Issue], status: IssueStatus) -> usize {
    issues.iter().filter(|issue| issue.status == status).count()
}
