//! Repository tagging and issue filtering over a [`MultiRepoData`].

use crate::domain::{Issue, IssueId, IssueStatus, MultiRepoData};
use crate::readiness::ready_ids;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::warn;

/// Maps each issue id to the repository that owns it.
///
/// When two repositories carry the same id the first one in load order
/// owns it. The later occurrences are kept in [`RepositoryIndex::duplicates`].
#[derive(Debug, Clone, Default)]
pub struct RepositoryIndex<'a> {
    owners: HashMap<&'a IssueId, &'a str>,
    duplicates: Vec<Duplicate<'a>>,
}

/// An issue id seen in more than one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate<'a> {
    /// The repeated id
    pub id: &'a IssueId,

    /// The repository that owns the id
    pub owner: &'a str,

    /// The repository whose copy was not indexed
    pub ignored: &'a str,
}

impl<'a> RepositoryIndex<'a> {
    /// Index every repository's issues in load order.
    #[must_use]
    pub fn build(data: &'a MultiRepoData) -> Self {
        let mut index = Self::default();

        for repo in &data.repositories {
            for issue in &repo.issues {
                match index.owners.get(&issue.id) {
                    Some(&owner) => {
                        warn!(
                            id = %issue.id,
                            owner,
                            ignored = %repo.name,
                            "Duplicate issue id across repositories"
                        );
                        index.duplicates.push(Duplicate {
                            id: &issue.id,
                            owner,
                            ignored: &repo.name,
                        });
                    }
                    None => {
                        index.owners.insert(&issue.id, &repo.name);
                    }
                }
            }
        }

        index
    }

    /// Name of the repository owning `id`
    #[must_use]
    pub fn owner(&self, id: &IssueId) -> Option<&'a str> {
        self.owners.get(id).copied()
    }

    /// Ids that appeared in more than one repository, in discovery order
    #[must_use]
    pub fn duplicates(&self) -> &[Duplicate<'a>] {
        &self.duplicates
    }
}

/// Optional narrowing criteria for an issue listing.
///
/// Values arrive as raw query text. A priority that does not start with an
/// integer is ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Exact status spelling (`open`, `in_progress`, `closed`)
    pub status: Option<String>,

    /// Priority, parsed leniently
    pub priority: Option<String>,

    /// Repository name
    pub repo: Option<String>,

    /// Keep only ready issues
    pub ready: bool,
}

impl IssueFilter {
    /// The priority criterion, if it parses as an integer
    #[must_use]
    pub fn priority_value(&self) -> Option<i64> {
        self.priority.as_deref().and_then(parse_priority)
    }

    fn matches_status(&self, status: IssueStatus) -> bool {
        self.status.as_deref().is_none_or(|s| s == status.as_str())
    }

    fn matches_repo(&self, repository: &str) -> bool {
        self.repo.as_deref().is_none_or(|r| r == repository)
    }
}

/// Parse the leading integer of `raw`, tolerating surrounding junk.
///
/// Leading whitespace and one sign are allowed; parsing stops at the first
/// non-digit. `"2abc"` is 2, `" -1"` is -1, `"abc"` and `""` are `None`.
#[must_use]
pub fn parse_priority(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Key the repository tag is written under
const REPOSITORY_KEY: &str = "repository";

/// An issue annotated with its owning repository.
///
/// A `repository` field carried through from the source line is dropped so
/// the tag is the only one written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedIssue<'a> {
    /// The issue fields, flattened
    #[serde(flatten)]
    pub issue: Cow<'a, Issue>,

    /// Owning repository name
    pub repository: &'a str,
}

impl<'a> TaggedIssue<'a> {
    /// Tag `issue` with `repository`.
    #[must_use]
    pub fn new(issue: &'a Issue, repository: &'a str) -> Self {
        let issue = if issue.extra.contains_key(REPOSITORY_KEY) {
            let mut owned = issue.clone();
            owned.extra.remove(REPOSITORY_KEY);
            Cow::Owned(owned)
        } else {
            Cow::Borrowed(issue)
        };
        Self { issue, repository }
    }
}

/// Tag, then filter, the aggregate's issues.
///
/// Readiness is decided over every loaded issue before any other criterion
/// narrows the set, so a blocker in another repository still counts.
#[must_use]
pub fn filter_issues<'a>(data: &'a MultiRepoData, filter: &IssueFilter) -> Vec<TaggedIssue<'a>> {
    let index = RepositoryIndex::build(data);
    let ready = filter.ready.then(|| ready_ids(&data.all_issues));
    let priority = filter.priority_value();

    data.all_issues
        .iter()
        .map(|issue| (issue, index.owner(&issue.id).unwrap_or_default()))
        .filter(|(issue, _)| filter.matches_status(issue.status))
        .filter(|(issue, _)| priority.is_none_or(|p| issue.priority == p))
        .filter(|(_, repository)| filter.matches_repo(repository))
        .filter(|(issue, _)| {
            ready
                .as_ref()
                .is_none_or(|ready| ready.contains(&issue.id))
        })
        .map(|(issue, repository)| TaggedIssue::new(issue, repository))
        .collect()
}
