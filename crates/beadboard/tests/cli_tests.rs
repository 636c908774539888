//! Integration tests for the beadboard CLI.
//!
//! These run the built binary against temp directory trees and check the
//! JSON contracts and the text rendering end to end.

use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{dependent_line, issue_line, run_beadboard, stdout_json, write_repo};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Two repositories with a blocker that crosses between them
#[fixture]
fn workspace() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let marker = write_repo(
        temp.path(),
        "api",
        &[
            issue_line("api-1", "closed"),
            dependent_line("api-2", "open", "web-1", "blocks"),
            dependent_line("api-3", "open", "api-1", "blocks"),
        ],
    );
    std::fs::write(marker.join("api.db"), "").unwrap();
    write_repo(
        temp.path(),
        "web",
        &[
            issue_line("web-1", "in_progress"),
            dependent_line("web-2", "open", "api-1", "related"),
        ],
    );
    temp
}

fn root_arg(temp: &TempDir) -> String {
    temp.path().display().to_string()
}

// ============================================================================
// Help and Source Selection
// ============================================================================

#[test]
fn test_cli_help_lists_commands() {
    let output = run_beadboard(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["repos", "issues", "graph", "metrics"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_cli_no_args() {
    let output = run_beadboard(&[]);
    assert!(output.status.success());
}

#[test]
fn test_cli_without_roots_fails() {
    let output = run_beadboard(&["repos"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no scan roots"));
}

#[test]
fn test_cli_github_without_token_fails() {
    let output = run_beadboard(&["--github", "repos"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unauthorized"));
}

#[rstest]
fn test_cli_roots_from_config_file(workspace: TempDir) {
    let config = workspace.path().join("beadboard.yaml");
    std::fs::write(
        &config,
        format!("scan:\n  roots:\n    - {}\n", root_arg(&workspace)),
    )
    .unwrap();

    let json = stdout_json(&run_beadboard(&[
        "--config",
        config.to_str().unwrap(),
        "--json",
        "repos",
    ]));

    assert_eq!(json["totalRepos"], 2);
}

// ============================================================================
// JSON Contracts
// ============================================================================

#[rstest]
fn test_repos_json(workspace: TempDir) {
    let json = stdout_json(&run_beadboard(&["--root", &root_arg(&workspace), "--json", "repos"]));

    assert_eq!(json["totalRepos"], 2);
    assert_eq!(json["totalIssues"], 5);
    assert_eq!(json["totalOpen"], 3);
    assert_eq!(json["repositories"][0]["name"], "api");
    assert_eq!(json["repositories"][0]["prefix"], "api");
    assert_eq!(json["repositories"][1]["inProgressCount"], 1);
}

#[rstest]
fn test_issues_ready_json(workspace: TempDir) {
    let json = stdout_json(&run_beadboard(&[
        "--root",
        &root_arg(&workspace),
        "--json",
        "issues",
        "--ready",
    ]));

    // api-2 is blocked by in-progress web-1 from the other repository.
    let ids: Vec<&str> = json["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["api-3", "web-2"]);
    assert_eq!(json["count"], 2);
    assert_eq!(json["issues"][1]["repository"], "web");
}

#[rstest]
fn test_issues_filters_json(workspace: TempDir) {
    let json = stdout_json(&run_beadboard(&[
        "--root",
        &root_arg(&workspace),
        "--json",
        "issues",
        "--repo",
        "api",
        "--priority",
        "1",
        "--status",
        "open",
    ]));

    assert_eq!(json["count"], 2);
}

#[rstest]
fn test_graph_json_direction(workspace: TempDir) {
    let json = stdout_json(&run_beadboard(&[
        "--root",
        &root_arg(&workspace),
        "--json",
        "graph",
        "--repo",
        "api",
    ]));

    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    let first_edge = &json["edges"][0];
    assert_eq!(first_edge["source"], "web-1");
    assert_eq!(first_edge["target"], "api-2");
    assert_eq!(first_edge["id"], "web-1-api-2-blocks");
    assert_eq!(first_edge["type"], "blocks");
}

#[rstest]
fn test_metrics_json(workspace: TempDir) {
    let json = stdout_json(&run_beadboard(&["--root", &root_arg(&workspace), "--json", "metrics"]));

    assert_eq!(json["repositories"], 2);
    assert_eq!(json["overall"]["total"], 5);
    assert_eq!(json["overall"]["readyCount"], 2);
    assert_eq!(json["overall"]["byStatus"]["in_progress"], 1);
    assert_eq!(json["byRepo"][0]["name"], "api");
    // Within api alone, web-1 is not loaded so api-2 counts as ready.
    assert_eq!(json["byRepo"][0]["metrics"]["readyCount"], 2);
}

// ============================================================================
// Text Output
// ============================================================================

#[rstest]
fn test_repos_text(workspace: TempDir) {
    let output = run_beadboard(&["--root", &root_arg(&workspace), "repos"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Repositories (2)"));
    assert!(stdout.contains("Total: 5 issues"));
}

#[rstest]
fn test_skipped_units_go_to_stderr(workspace: TempDir) {
    std::fs::create_dir_all(workspace.path().join("hollow/.beads")).unwrap();

    let output = run_beadboard(&["--root", &root_arg(&workspace), "repos"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Skipped 1 unit(s):"));
    assert!(stderr.contains("marker directory has no issues.jsonl"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Skipped"));
}

#[rstest]
fn test_json_mode_keeps_stdout_clean_with_skips(workspace: TempDir) {
    std::fs::create_dir_all(workspace.path().join("hollow/.beads")).unwrap();

    let json = stdout_json(&run_beadboard(&["--root", &root_arg(&workspace), "--json", "repos"]));

    assert_eq!(json["totalRepos"], 2);
}
