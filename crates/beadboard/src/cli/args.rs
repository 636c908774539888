//! CLI argument structs.
//!
//! Source selection is shared by every command; each report command then
//! has its own argument struct.

use clap::{Args, Parser};
use std::path::PathBuf;

use super::types::IssueStatusArg;

/// Where repositories are loaded from. Exactly one loader runs per invocation.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    /// Directory to scan for repositories (repeatable)
    ///
    /// Overrides `scan.roots` from the configuration file.
    #[arg(long = "root", value_name = "PATH", conflicts_with = "github")]
    pub roots: Vec<PathBuf>,

    /// How many directory levels below each root to search
    #[arg(long, value_name = "N", conflicts_with = "github")]
    pub max_depth: Option<usize>,

    /// Load from every GitHub repository visible to the token
    #[arg(long)]
    pub github: bool,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Arguments for the `repos` command
#[derive(Parser, Debug, Clone, Default)]
pub struct ReposArgs {}

/// Arguments for the `issues` command
#[derive(Parser, Debug, Clone, Default)]
pub struct IssuesArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<IssueStatusArg>,

    /// Filter by priority
    ///
    /// A value that does not start with an integer is ignored.
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Filter by repository name
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Only show issues that are ready to work on
    #[arg(long)]
    pub ready: bool,
}

/// Arguments for the `graph` command
#[derive(Parser, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Graph a single repository (unknown names graph everything)
    #[arg(short, long)]
    pub repo: Option<String>,
}

/// Arguments for the `metrics` command
#[derive(Parser, Debug, Clone, Default)]
pub struct MetricsArgs {}
