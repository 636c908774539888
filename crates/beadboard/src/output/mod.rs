//! Output formatting for CLI commands.
//!
//! Every command prints either its JSON contract (pretty-printed) or a
//! colored text rendering of the same view. Skipped units from the load go
//! to stderr in text mode so they never mix with the report itself.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub mod color;

use crate::domain::{Issue, IssueStatus};
use crate::graph::DependencyGraph;
use crate::metrics::Metrics;
use crate::source::Skipped;
use crate::views::{IssuesView, MetricsView, RepositoriesView};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{success, warning};

use color::{
    bold, colored_status_icon, colored_type_icon, colorize_id, colorize_priority, colorize_repo,
    colorize_status, cyan, dimmed,
};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `BEADBOARD_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `BEADBOARD_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `BEADBOARD_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match lookup("BEADBOARD_MAX_WIDTH") {
            Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "BEADBOARD_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("BEADBOARD_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "BEADBOARD_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // https://no-color.org/
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("BEADBOARD_COLOR").is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    fn content_width(&self) -> usize {
        get_terminal_width().min(self.max_width)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size().map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| {
        usize::from(w.0)
    })
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print the repositories listing
pub fn print_repositories(view: &RepositoriesView<'_>, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(view),
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_repositories_text(&mut io::stdout().lock(), view, &config)
        }
    }
}

/// Print the issues listing
pub fn print_issues(view: &IssuesView<'_>, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(view),
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let width = config.content_width();
            print_issues_text(&mut io::stdout().lock(), view, width, &config)
        }
    }
}

/// Print the dependency graph
pub fn print_graph(graph: &DependencyGraph, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(graph),
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_graph_text(&mut io::stdout().lock(), graph, &config)
        }
    }
}

/// Print overall and per-repository metrics
pub fn print_metrics(view: &MetricsView<'_>, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(view),
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_metrics_text(&mut io::stdout().lock(), view, &config)
        }
    }
}

/// List skipped units on stderr. Nothing is printed in JSON mode.
pub fn print_skipped(skipped: &[Skipped], mode: OutputMode) -> io::Result<()> {
    if mode == OutputMode::Json || skipped.is_empty() {
        return Ok(());
    }
    let config = OutputConfig::from_env();
    print_skipped_text(&mut io::stderr().lock(), skipped, &config)
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn print_repositories_text<W: Write>(
    w: &mut W,
    view: &RepositoriesView<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    if view.repositories.is_empty() {
        writeln!(w, "No repositories found.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{} ({})",
        bold("Repositories", config),
        view.total_repos
    )?;
    writeln!(w)?;

    for repo in &view.repositories {
        writeln!(
            w,
            "{} [{}]  {}",
            colorize_repo(repo.name, config),
            repo.prefix,
            dimmed(repo.path, config)
        )?;
        writeln!(
            w,
            "  {} {}  {} {}  {} {}  {} {}",
            dimmed("issues:", config),
            repo.issue_count,
            dimmed("open:", config),
            repo.open_count,
            dimmed("in progress:", config),
            repo.in_progress_count,
            dimmed("closed:", config),
            repo.closed_count
        )?;
    }

    writeln!(w)?;
    writeln!(
        w,
        "{} {} issues, {} open, {} in progress, {} closed",
        bold("Total:", config),
        view.total_issues,
        view.total_open,
        view.total_in_progress,
        view.total_closed
    )
}

fn print_issues_text<W: Write>(
    w: &mut W,
    view: &IssuesView<'_>,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if view.issues.is_empty() {
        writeln!(w, "No issues found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} issue(s):", view.count)?;
    writeln!(w)?;

    for tagged in &view.issues {
        let issue: &Issue = &tagged.issue;
        writeln!(
            w,
            "{} {}  {}  {}  {}",
            colored_status_icon(issue.status, config),
            colorize_id(issue.id.as_str(), config),
            colored_type_icon(issue.issue_type, config),
            colorize_priority(issue.priority, config),
            colorize_repo(tagged.repository, config)
        )?;
        for line in wrap_text(&issue.title, width.saturating_sub(4)) {
            writeln!(w, "    {line}")?;
        }
        if let Some(ref assignee) = issue.assignee {
            writeln!(w, "    {} {}", dimmed("Assignee:", config), assignee)?;
        }
    }

    Ok(())
}

fn print_graph_text<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {} nodes, {} edges",
        bold("Dependency graph:", config),
        graph.nodes.len(),
        graph.edges.len()
    )?;

    if !graph.edges.is_empty() {
        writeln!(w)?;
    }
    let arrow = if config.use_ascii { "->" } else { "→" };
    for edge in &graph.edges {
        writeln!(
            w,
            "  {} {} {} {}",
            colorize_id(edge.source.as_str(), config),
            cyan(arrow, config),
            colorize_id(edge.target.as_str(), config),
            dimmed(&format!("({})", edge.dep_type), config)
        )?;
    }

    let dangling = graph.dangling_edges().len();
    if dangling > 0 {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            warning(
                &format!("{dangling} edge(s) reference issues outside the graph"),
                config
            )
        )?;
    }

    Ok(())
}

fn print_metrics_block<W: Write>(
    w: &mut W,
    metrics: &Metrics,
    indent: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{indent}{} {}  {} {}",
        dimmed("total:", config),
        metrics.total,
        dimmed("ready:", config),
        success(&metrics.ready_count.to_string(), config)
    )?;
    writeln!(
        w,
        "{indent}{} {} {}, {} {}, {} {}, {} {}",
        dimmed("status:", config),
        colorize_status(IssueStatus::Open, config),
        metrics.by_status.open,
        colorize_status(IssueStatus::InProgress, config),
        metrics.by_status.in_progress,
        colorize_status(IssueStatus::Blocked, config),
        metrics.by_status.blocked,
        colorize_status(IssueStatus::Closed, config),
        metrics.by_status.closed
    )?;
    let p = &metrics.by_priority;
    writeln!(
        w,
        "{indent}{} P0 {}, P1 {}, P2 {}, P3 {}, P4 {}",
        dimmed("priority:", config),
        p.p0,
        p.p1,
        p.p2,
        p.p3,
        p.p4
    )?;
    let t = &metrics.by_type;
    writeln!(
        w,
        "{indent}{} task {}, feature {}, bug {}, epic {}, chore {}",
        dimmed("type:", config),
        t.task,
        t.feature,
        t.bug,
        t.epic,
        t.chore
    )?;
    writeln!(
        w,
        "{indent}{} {:.2}",
        dimmed("deps/issue:", config),
        metrics.avg_deps_per_issue
    )
}

fn print_metrics_text<W: Write>(
    w: &mut W,
    view: &MetricsView<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} ({} repositories)",
        bold("Overall", config),
        view.repositories
    )?;
    print_metrics_block(w, &view.overall, "  ", config)?;

    for repo in &view.by_repo {
        writeln!(w)?;
        writeln!(w, "{}", colorize_repo(repo.name, config))?;
        print_metrics_block(w, &repo.metrics, "  ", config)?;
    }

    Ok(())
}

fn print_skipped_text<W: Write>(
    w: &mut W,
    skipped: &[Skipped],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{}",
        warning(&format!("Skipped {} unit(s):", skipped.len()), config)
    )?;
    for entry in skipped {
        writeln!(w, "  {} {}", dimmed(&entry.location, config), entry.reason)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::IssueFilter;
    use crate::domain::test_support::{depends, issue, repository};
    use crate::domain::{DependencyType, IssueStatus, MultiRepoData};
    use crate::error::SkipReason;
    use crate::views::graph_view;
    use std::collections::HashMap;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, true, false)
    }

    fn sample() -> MultiRepoData {
        let mut long = issue("a-2", IssueStatus::InProgress);
        long.title = "A rather long title that certainly needs to wrap onto another line".into();
        long.assignee = Some("sam".to_string());
        MultiRepoData::from_repositories(vec![
            repository(
                "alpha",
                vec![
                    depends(issue("a-1", IssueStatus::Open), "zz-9", DependencyType::Blocks),
                    long,
                ],
            ),
            repository("beta", vec![issue("b-1", IssueStatus::Closed)]),
        ])
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn config_from(pairs: &[(&str, &str)]) -> OutputConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        OutputConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_output_config_defaults() {
        assert_eq!(config_from(&[]), OutputConfig::default());
    }

    #[test]
    fn test_output_config_reads_overrides() {
        let config = config_from(&[("BEADBOARD_MAX_WIDTH", "120"), ("BEADBOARD_ASCII", "1")]);
        assert_eq!(config.max_width, 120);
        assert!(config.use_ascii);
        assert!(config.use_colors);
    }

    #[test]
    fn test_output_config_invalid_values_fall_back() {
        let config = config_from(&[("BEADBOARD_MAX_WIDTH", "wide"), ("BEADBOARD_ASCII", "maybe")]);
        assert_eq!(config.max_width, DEFAULT_MAX_CONTENT_WIDTH);
        assert!(!config.use_ascii);
    }

    #[test]
    fn test_output_config_color_switches() {
        assert!(!config_from(&[("NO_COLOR", "")]).use_colors);
        assert!(!config_from(&[("BEADBOARD_COLOR", "0")]).use_colors);
        assert!(!config_from(&[("BEADBOARD_COLOR", "FALSE")]).use_colors);
        assert!(config_from(&[("BEADBOARD_COLOR", "1")]).use_colors);
    }

    #[test]
    fn test_print_repositories_text() {
        let data = sample();
        let output = render(|w| print_repositories_text(w, &RepositoriesView::new(&data), &plain()));

        assert!(output.contains("Repositories (2)"));
        assert!(output.contains("alpha [alpha]  /src/alpha"));
        assert!(output.contains("Total: 3 issues, 1 open, 1 in progress, 1 closed"));
    }

    #[test]
    fn test_print_repositories_text_empty() {
        let data = MultiRepoData::default();
        let output = render(|w| print_repositories_text(w, &RepositoriesView::new(&data), &plain()));
        assert_eq!(output, "No repositories found.\n");
    }

    #[test]
    fn test_print_issues_text_wraps_titles() {
        let data = sample();
        let view = IssuesView::new(&data, &IssueFilter::default());
        let output = render(|w| print_issues_text(w, &view, 30, &plain()));

        assert!(output.contains("Found 3 issue(s):"));
        assert!(output.contains("> a-2  -  P2  alpha"));
        assert!(output.contains("Assignee: sam"));
        for line in output.lines().filter(|l| l.starts_with("    A rather")) {
            assert!(line.len() <= 30, "line '{line}' exceeds width");
        }
    }

    #[test]
    fn test_print_graph_text_reports_dangling_edges() {
        let data = sample();
        let output = render(|w| print_graph_text(w, &graph_view(&data, None), &plain()));

        assert!(output.contains("3 nodes, 1 edges"));
        assert!(output.contains("zz-9 -> a-1 (blocks)"));
        assert!(output.contains("1 edge(s) reference issues outside the graph"));
    }

    #[test]
    fn test_print_metrics_text() {
        let data = sample();
        let output = render(|w| print_metrics_text(w, &MetricsView::new(&data), &plain()));

        assert!(output.contains("Overall (2 repositories)"));
        assert!(output.contains("total: 3  ready: 1"));
        assert!(output.contains("status: open 1, in_progress 1, blocked 0, closed 1"));
        assert!(output.contains("deps/issue: 0.33"));
        assert!(output.contains("\nbeta\n"));
    }

    #[test]
    fn test_print_skipped_text() {
        let skipped = vec![Skipped::new("/src/gone", SkipReason::MissingIssueFile)];
        let output = render(|w| print_skipped_text(w, &skipped, &plain()));

        assert!(output.contains("Skipped 1 unit(s):"));
        assert!(output.contains("/src/gone marker directory has no issues.jsonl"));
    }

    #[test]
    fn test_wrap_text_with_narrow_width() {
        for line in wrap_text("Hello world", 5) {
            assert!(line.len() <= 5, "Line '{line}' exceeds width 5");
        }
    }

    #[test]
    fn test_wrap_text_zero_width_does_not_panic() {
        assert!(!wrap_text("abc", 0).is_empty());
    }
}
