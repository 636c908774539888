//! Beadboard - issue dashboards across many repositories.
//!
//! Repositories that track work with beads keep an export of their issues in
//! `.beads/issues.jsonl`. This crate finds those exports, either by scanning
//! local directory trees or by asking the GitHub API, and aggregates them
//! into a single [`domain::MultiRepoData`]. The analysis modules then answer
//! the usual questions over the aggregate: which issues are ready, how they
//! depend on each other, and how the work is distributed.
//!
//! ```no_run
//! use beadboard::source::RepositorySource;
//! use beadboard::source::filesystem::FilesystemSource;
//! use beadboard::views::MetricsView;
//!
//! # async fn run() -> beadboard::error::Result<()> {
//! let report = FilesystemSource::new(["/home/me/code"]).load().await?;
//! let metrics = MetricsView::new(&report.data);
//! println!("{} ready issues", metrics.overall.ready_count);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod aggregate;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod readiness;
pub mod source;
pub mod views;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;
pub mod output;
