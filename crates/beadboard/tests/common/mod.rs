//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// One export line for an issue with no dependencies.
pub fn issue_line(id: &str, status: &str) -> String {
    json!({
        "id": id,
        "title": format!("Issue {id}"),
        "status": status,
        "priority": 2,
        "issue_type": "task",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
    .to_string()
}

/// One export line for an issue that depends on `on` with the given type.
pub fn dependent_line(id: &str, status: &str, on: &str, dep_type: &str) -> String {
    json!({
        "id": id,
        "title": format!("Issue {id}"),
        "status": status,
        "priority": 1,
        "issue_type": "feature",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
        "dependencies": [{
            "issue_id": id,
            "depends_on_id": on,
            "type": dep_type,
            "created_at": "2025-01-01T00:00:00Z",
            "created_by": "tester"
        }]
    })
    .to_string()
}

/// Create `<root>/<rel>/.beads/issues.jsonl` holding `lines`, returning the marker path.
pub fn write_repo(root: &Path, rel: &str, lines: &[String]) -> PathBuf {
    let marker = root.join(rel).join(".beads");
    std::fs::create_dir_all(&marker).expect("Failed to create marker directory");
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(marker.join("issues.jsonl"), content).expect("Failed to write issues.jsonl");
    marker
}

/// Run the beadboard binary with colors and ambient credentials disabled.
pub fn run_beadboard(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_beadboard"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute beadboard binary")
}

/// Parse stdout of a `--json` run.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "beadboard failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}
