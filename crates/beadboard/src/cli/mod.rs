//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `repos`: List discovered repositories with status counts
//! - `issues`: List issues across repositories with optional filters
//! - `graph`: Show the dependency graph
//! - `metrics`: Show overall and per-repository metrics
//!
//! # Global Flags
//!
//! - `--json`: Output the JSON contract instead of text
//! - `--config FILE`: Read scan roots and API settings from a YAML file
//!
//! # Example
//!
//! ```bash
//! beadboard --root ~/code repos
//! beadboard --root ~/code --root ~/work issues --status open --ready
//! beadboard --github --json metrics
//! ```

mod args;
mod execute;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{GraphArgs, IssuesArgs, MetricsArgs, ReposArgs, SourceArgs};
pub use types::IssueStatusArg;

use crate::app::{App, SourceSelection};
use crate::config::Config;
use crate::output::OutputMode;

/// Beadboard - issue dashboards across many repositories
///
/// Finds every repository carrying a `.beads/issues.jsonl` export, either on
/// disk or on GitHub, and reports on all of their issues together.
#[derive(Parser, Debug)]
#[command(name = "beadboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository source selection
    #[command(flatten)]
    pub source: SourceArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List repositories
    ///
    /// Shows each repository's location, prefix, and issue counts by status.
    Repos(ReposArgs),

    /// List issues with optional filters
    ///
    /// Every issue is tagged with the repository it came from. `--ready`
    /// keeps open issues whose blockers are all closed or not loaded.
    Issues(IssuesArgs),

    /// Show the dependency graph
    ///
    /// Edges point from the prerequisite to the dependent issue.
    Graph(GraphArgs),

    /// Show issue metrics
    ///
    /// Status, priority, and type histograms plus ready counts, overall and
    /// per repository.
    Metrics(MetricsArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// The loader the arguments select
    #[must_use]
    pub fn source_selection(&self) -> SourceSelection {
        if self.source.github {
            SourceSelection::GitHub {
                token: self.source.token.clone(),
            }
        } else {
            SourceSelection::Filesystem {
                roots: self.source.roots.clone(),
                max_depth: self.source.max_depth,
            }
        }
    }

    async fn load_config(&self) -> Result<Config> {
        Ok(match &self.config {
            Some(path) => Config::load(path).await?,
            None => Config::default(),
        })
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Fails on an unreadable config file, a missing source, or a rejected
    /// credential. Skipped repositories are reported, not returned as errors.
    pub async fn execute(&self) -> Result<()> {
        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Beadboard multi-repository issue dashboard");
            println!("Use --help for more information");
            return Ok(());
        };

        let config = self.load_config().await?;
        let app = App::from_selection(self.source_selection(), &config)?;

        match command {
            Commands::Repos(args) => execute::execute_repos(&app, args, output_mode).await,
            Commands::Issues(args) => execute::execute_issues(&app, args, output_mode).await,
            Commands::Graph(args) => execute::execute_graph(&app, args, output_mode).await,
            Commands::Metrics(args) => execute::execute_metrics(&app, args, output_mode).await,
        }
    }
}
