//! Command execution logic.

use anyhow::Result;

use super::args::{GraphArgs, IssuesArgs, MetricsArgs, ReposArgs};
use crate::aggregate::IssueFilter;
use crate::app::App;
use crate::output::{self, OutputMode};
use crate::source::LoadReport;
use crate::views::{IssuesView, MetricsView, RepositoriesView, graph_view};

async fn load(app: &App, output_mode: OutputMode) -> Result<LoadReport> {
    let report = app.load().await?;
    output::print_skipped(&report.skipped, output_mode)?;
    Ok(report)
}

/// Execute the repos command
pub async fn execute_repos(app: &App, _args: &ReposArgs, output_mode: OutputMode) -> Result<()> {
    let report = load(app, output_mode).await?;
    output::print_repositories(&RepositoriesView::new(&report.data), output_mode)?;
    Ok(())
}

/// Execute the issues command
pub async fn execute_issues(app: &App, args: &IssuesArgs, output_mode: OutputMode) -> Result<()> {
    let report = load(app, output_mode).await?;
    let filter = issue_filter(args);
    output::print_issues(&IssuesView::new(&report.data, &filter), output_mode)?;
    Ok(())
}

/// Execute the graph command
pub async fn execute_graph(app: &App, args: &GraphArgs, output_mode: OutputMode) -> Result<()> {
    let report = load(app, output_mode).await?;
    let graph = graph_view(&report.data, args.repo.as_deref());
    output::print_graph(&graph, output_mode)?;
    Ok(())
}

/// Execute the metrics command
pub async fn execute_metrics(
    app: &App,
    _args: &MetricsArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let report = load(app, output_mode).await?;
    output::print_metrics(&MetricsView::new(&report.data), output_mode)?;
    Ok(())
}

pub(crate) fn issue_filter(args: &IssuesArgs) -> IssueFilter {
    IssueFilter {
        status: args.status.map(|s| s.to_string()),
        priority: args.priority.clone(),
        repo: args.repo.clone(),
        ready: args.ready,
    }
}
