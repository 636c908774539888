//! Ready-to-work detection.
//!
//! An issue is ready when it is open and none of its `blocks` dependencies
//! points at an unfinished issue in the same input set.
//!
//! # Scope
//!
//! - Only `blocks` edges matter. `related`, `parent-child` and
//!   `discovered-from` never block.
//! - A blocker that is not in the input set does not block. Dependencies on
//!   other repositories or on deleted issues therefore never hold work back.
//! - The check is one hop. A blocker's own blockers are not followed; its
//!   status is trusted to reflect them.

use crate::domain::{Issue, IssueId, IssueStatus};
use std::collections::{HashMap, HashSet};

/// Return the ready subset of `issues`, in input order.
#[must_use]
pub fn ready_issues(issues: &[Issue]) -> Vec<&Issue> {
    let by_id: HashMap<&IssueId, &Issue> = issues.iter().map(|issue| (&issue.id, issue)).collect();

    issues
        .iter()
        .filter(|issue| is_ready(issue, &by_id))
        .collect()
}

/// IDs of the ready subset of `issues`.
#[must_use]
pub fn ready_ids(issues: &[Issue]) -> HashSet<&IssueId> {
    ready_issues(issues).into_iter().map(|issue| &issue.id).collect()
}

fn is_ready(issue: &Issue, by_id: &HashMap<&IssueId, &Issue>) -> bool {
    if issue.status != IssueStatus::Open {
        return false;
    }

    issue.blocking_dependencies().all(|dep| {
        by_id
            .get(&dep.depends_on_id)
            .is_none_or(|blocker| blocker.status == IssueStatus::Closed)
    })
}
