//! Summary statistics over an issue set.

use crate::domain::{Issue, IssueStatus, IssueType};
use crate::readiness::ready_issues;
use serde::Serialize;

/// Counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Open issues
    pub open: usize,
    /// In-progress issues
    pub in_progress: usize,
    /// Blocked issues
    pub blocked: usize,
    /// Closed issues
    pub closed: usize,
}

/// Counts by priority. Priorities outside 0-4 are not counted anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    /// Priority 0
    pub p0: usize,
    /// Priority 1
    pub p1: usize,
    /// Priority 2
    pub p2: usize,
    /// Priority 3
    pub p3: usize,
    /// Priority 4
    pub p4: usize,
}

impl PriorityCounts {
    /// Sum of all five buckets
    #[must_use]
    pub fn total(&self) -> usize {
        self.p0 + self.p1 + self.p2 + self.p3 + self.p4
    }
}

/// Counts by issue type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    /// Tasks
    pub task: usize,
    /// Features
    pub feature: usize,
    /// Bugs
    pub bug: usize,
    /// Epics
    pub epic: usize,
    /// Chores
    pub chore: usize,
}

/// Metrics for one issue set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Number of issues
    pub total: usize,

    /// Status histogram
    pub by_status: StatusCounts,

    /// Priority histogram
    pub by_priority: PriorityCounts,

    /// Type histogram
    pub by_type: TypeCounts,

    /// Mean dependency entries per issue; 0 for an empty set
    pub avg_deps_per_issue: f64,

    /// Number of ready issues
    pub ready_count: usize,
}

/// Compute [`Metrics`] for `issues`. Readiness only sees `issues` itself.
#[must_use]
pub fn calculate_metrics(issues: &[Issue]) -> Metrics {
    let mut metrics = Metrics {
        total: issues.len(),
        ..Metrics::default()
    };
    let mut dependency_count = 0usize;

    for issue in issues {
        match issue.status {
            IssueStatus::Open => metrics.by_status.open += 1,
            IssueStatus::InProgress => metrics.by_status.in_progress += 1,
            IssueStatus::Blocked => metrics.by_status.blocked += 1,
            IssueStatus::Closed => metrics.by_status.closed += 1,
        }

        match issue.priority {
            0 => metrics.by_priority.p0 += 1,
            1 => metrics.by_priority.p1 += 1,
            2 => metrics.by_priority.p2 += 1,
            3 => metrics.by_priority.p3 += 1,
            4 => metrics.by_priority.p4 += 1,
            _ => {}
        }

        match issue.issue_type {
            IssueType::Task => metrics.by_type.task += 1,
            IssueType::Feature => metrics.by_type.feature += 1,
            IssueType::Bug => metrics.by_type.bug += 1,
            IssueType::Epic => metrics.by_type.epic += 1,
            IssueType::Chore => metrics.by_type.chore += 1,
        }

        dependency_count += issue.dependencies.len();
    }

    #[allow(clippy::cast_precision_loss)]
    {
        metrics.avg_deps_per_issue = dependency_count as f64 / issues.len().max(1) as f64;
    }
    metrics.ready_count = ready_issues(issues).len();

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyType;
    use crate::domain::test_support::{depends, issue};
    use proptest::prelude::*;

    #[test]
    fn empty_set_has_zero_metrics() {
        let metrics = calculate_metrics(&[]);

        assert_eq!(metrics.total, 0);
        assert!(metrics.avg_deps_per_issue.abs() < f64::EPSILON);
        assert_eq!(metrics.ready_count, 0);
    }

    #[test]
    fn counts_each_histogram() {
        let mut bug = issue("b", IssueStatus::Closed);
        bug.issue_type = IssueType::Bug;
        bug.priority = 0;
        let mut stray = issue("s", IssueStatus::InProgress);
        stray.priority = 7;
        let blocked = depends(
            depends(issue("x", IssueStatus::Open), "s", DependencyType::Blocks),
            "b",
            DependencyType::Related,
        );

        let metrics = calculate_metrics(&[bug, stray, blocked]);

        assert_eq!(metrics.total, 3);
        assert_eq!(
            metrics.by_status,
            StatusCounts {
                open: 1,
                in_progress: 1,
                blocked: 0,
                closed: 1
            }
        );
        assert_eq!(metrics.by_priority.p0, 1);
        assert_eq!(metrics.by_priority.p2, 1);
        assert_eq!(metrics.by_priority.total(), 2);
        assert_eq!(metrics.by_type.bug, 1);
        assert_eq!(metrics.by_type.task, 2);
        assert!((metrics.avg_deps_per_issue - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(metrics.ready_count, 0);
    }

    #[test]
    fn serializes_with_contract_keys() {
        let json = serde_json::to_value(calculate_metrics(&[issue("a", IssueStatus::Open)]))
            .unwrap();

        assert_eq!(json["byStatus"]["in_progress"], 0);
        assert_eq!(json["byPriority"]["p2"], 1);
        assert_eq!(json["byType"]["task"], 1);
        assert_eq!(json["readyCount"], 1);
        assert!(json.get("avgDepsPerIssue").is_some());
    }

    fn arb_status() -> impl Strategy<Value = IssueStatus> {
        prop_oneof![
            Just(IssueStatus::Open),
            Just(IssueStatus::InProgress),
            Just(IssueStatus::Blocked),
            Just(IssueStatus::Closed),
        ]
    }

    fn arb_issues() -> impl Strategy<Value = Vec<Issue>> {
        prop::collection::vec((arb_status(), -2i64..8, 0usize..4, 0usize..4), 0..40).prop_map(
            |specs| {
                specs
                    .iter()
                    .enumerate()
                    .map(|(i, &(status, priority, deps, target))| {
                        let mut item = issue(&format!("P-{i}"), status);
                        item.priority = priority;
                        for _ in 0..deps {
                            item = depends(item, &format!("P-{target}"), DependencyType::Blocks);
                        }
                        item
                    })
                    .collect()
            },
        )
    }

    #[test]
    fn blocked_and_chore_have_their_own_buckets() {
        let mut chore = issue("c", IssueStatus::Blocked);
        chore.issue_type = IssueType::Chore;
        let waiting = depends(issue("w", IssueStatus::Open), "c", DependencyType::Blocks);

        let metrics = calculate_metrics(&[chore, waiting]);

        assert_eq!(metrics.by_status.blocked, 1);
        assert_eq!(metrics.by_status.open, 1);
        assert_eq!(metrics.by_type.chore, 1);
        assert_eq!(metrics.ready_count, 0);
    }

    proptest! {
        #[test]
        fn total_matches_input_length(issues in arb_issues()) {
            prop_assert_eq!(calculate_metrics(&issues).total, issues.len());
        }

        #[test]
        fn status_buckets_sum_to_total(issues in arb_issues()) {
            let m = calculate_metrics(&issues);
            let s = m.by_status;
            prop_assert_eq!(s.open + s.in_progress + s.blocked + s.closed, m.total);
        }

        #[test]
        fn priority_buckets_count_only_in_range(issues in arb_issues()) {
            let in_range = issues.iter().filter(|i| (0..=4).contains(&i.priority)).count();
            prop_assert_eq!(calculate_metrics(&issues).by_priority.total(), in_range);
        }

        #[test]
        fn ready_count_never_exceeds_open(issues in arb_issues()) {
            let m = calculate_metrics(&issues);
            prop_assert!(m.ready_count <= m.by_status.open);
        }

        #[test]
        fn readiness_is_idempotent(issues in arb_issues()) {
            let first: Vec<Issue> = ready_issues(&issues).into_iter().cloned().collect();
            let second: Vec<Issue> = ready_issues(&first).into_iter().cloned().collect();
            prop_assert_eq!(first, second);
        }
    }
}
