//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::IssueStatus;

/// Issue status for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStatusArg {
    /// Not started
    Open,
    /// Currently being worked on
    #[value(name = "in_progress", alias = "in-progress")]
    InProgress,
    /// Waiting on something outside the tracker
    Blocked,
    /// Completed
    Closed,
}

impl From<IssueStatusArg> for IssueStatus {
    fn from(arg: IssueStatusArg) -> Self {
        match arg {
            IssueStatusArg::Open => Self::Open,
            IssueStatusArg::InProgress => Self::InProgress,
            IssueStatusArg::Blocked => Self::Blocked,
            IssueStatusArg::Closed => Self::Closed,
        }
    }
}

impl std::fmt::Display for IssueStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(IssueStatus::from(*self).as_str())
    }
}
