//! Dependency graph construction.
//!
//! Every issue becomes a node and every dependency entry becomes an edge
//! pointing from the prerequisite to the dependent: for "A depends on B" the
//! edge runs `B -> A`, read as "B must complete before A".
//!
//! Nothing is validated. Edges may name issues that are not nodes, and
//! cycles pass through untouched; [`DependencyGraph::dangling_edges`] is there
//! for callers that want to surface the former.

use crate::aggregate::RepositoryIndex;
use crate::domain::{DependencyType, Issue, IssueId, IssueStatus, IssueType};
use serde::Serialize;
use std::collections::HashSet;

/// Repository name given to issues the index does not know.
pub const UNKNOWN_REPOSITORY: &str = "unknown";

/// One issue in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyGraphNode {
    /// Issue id
    pub id: IssueId,

    /// Issue title
    pub title: String,

    /// Issue status
    pub status: IssueStatus,

    /// Issue priority
    pub priority: i64,

    /// Issue type
    #[serde(rename = "type")]
    pub issue_type: IssueType,

    /// Owning repository name
    pub repo: String,

    /// Assignee, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// One dependency in the graph, directed prerequisite to dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyGraphEdge {
    /// `"{depends_on_id}-{issue_id}-{type}"`
    pub id: String,

    /// The prerequisite (`depends_on_id`)
    pub source: IssueId,

    /// The dependent (`issue_id`)
    pub target: IssueId,

    /// Dependency type
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
}

/// Nodes and edges in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    /// One node per issue
    pub nodes: Vec<DependencyGraphNode>,

    /// One edge per dependency entry
    pub edges: Vec<DependencyGraphEdge>,
}

impl DependencyGraph {
    /// Edges whose source or target is not among the nodes
    #[must_use]
    pub fn dangling_edges(&self) -> Vec<&DependencyGraphEdge> {
        let known: HashSet<&IssueId> = self.nodes.iter().map(|n| &n.id).collect();
        self.edges
            .iter()
            .filter(|e| !known.contains(&e.source) || !known.contains(&e.target))
            .collect()
    }
}

/// Build the graph for `issues`, naming each node's repository through `index`.
#[must_use]
pub fn build_dependency_graph<'a, I>(issues: I, index: &RepositoryIndex<'_>) -> DependencyGraph
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut graph = DependencyGraph::default();

    for issue in issues {
        graph.nodes.push(DependencyGraphNode {
            id: issue.id.clone(),
            title: issue.title.clone(),
            status: issue.status,
            priority: issue.priority,
            issue_type: issue.issue_type,
            repo: index
                .owner(&issue.id)
                .unwrap_or(UNKNOWN_REPOSITORY)
                .to_string(),
            assignee: issue.assignee.clone(),
        });

        graph
            .edges
            .extend(issue.dependencies.iter().map(|dep| DependencyGraphEdge {
                id: format!("{}-{}-{}", dep.depends_on_id, dep.issue_id, dep.dep_type),
                source: dep.depends_on_id.clone(),
                target: dep.issue_id.clone(),
                dep_type: dep.dep_type,
            }));
    }

    graph
}
