//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success/Done:  green   (closed status, ready issues)
//!   - Warning/Active: yellow (in_progress, P1 priority, skipped units)
//!   - Error:         red     (P0 priority, bugs)
//!   - Info/Reference: cyan   (issue IDs, edge arrows)
//!   - Accent:        magenta (repository names, epics)
//!   - Muted:         dimmed  (field labels, paths)
//!   - Emphasis:      bold    (section headers, P0)
//!   - Default:       white   (open status)

use crate::domain::{IssueStatus, IssueType};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply color to status text based on issue status.
pub(crate) fn colorize_status(status: IssueStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        IssueStatus::Open => text.white().to_string(),
        IssueStatus::InProgress => text.yellow().to_string(),
        IssueStatus::Blocked => text.red().to_string(),
        IssueStatus::Closed => text.green().to_string(),
    }
}

/// Apply color to priority text based on priority level.
pub(crate) fn colorize_priority(priority: i64, config: &OutputConfig) -> String {
    let text = format!("P{priority}");
    if !config.use_colors {
        return text;
    }
    match priority {
        0 => text.red().bold().to_string(),
        1 => text.yellow().to_string(),
        _ => text,
    }
}

/// Colorize an issue ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Colorize a repository name (magenta).
pub(crate) fn colorize_repo(name: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return name.to_string();
    }
    name.magenta().to_string()
}

/// Get a colored status icon, with ASCII fallback support.
pub(crate) fn colored_status_icon(status: IssueStatus, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        match status {
            IssueStatus::Open => "o",
            IssueStatus::InProgress => ">",
            IssueStatus::Blocked => "x",
            IssueStatus::Closed => "+",
        }
    } else {
        match status {
            IssueStatus::Open => "○",
            IssueStatus::InProgress => "▶",
            IssueStatus::Blocked => "✗",
            IssueStatus::Closed => "✓",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }

    match status {
        IssueStatus::Open => icon.white().to_string(),
        IssueStatus::InProgress => icon.yellow().to_string(),
        IssueStatus::Blocked => icon.red().to_string(),
        IssueStatus::Closed => icon.green().to_string(),
    }
}

/// Apply dimmed style to text.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Apply cyan color to text (for arrows/connectors).
pub(crate) fn cyan(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Get a type icon for issue types, with ASCII fallback support.
pub(crate) fn type_icon(issue_type: IssueType, config: &OutputConfig) -> &'static str {
    if config.use_ascii {
        match issue_type {
            IssueType::Task => "-",
            IssueType::Bug => "*",
            IssueType::Feature => "+",
            IssueType::Epic => "#",
            IssueType::Chore => ".",
        }
    } else {
        match issue_type {
            IssueType::Task => "◇",
            IssueType::Bug => "●",
            IssueType::Feature => "★",
            IssueType::Epic => "◆",
            IssueType::Chore => "○",
        }
    }
}

/// Get a colored type icon for issue types.
pub(crate) fn colored_type_icon(issue_type: IssueType, config: &OutputConfig) -> String {
    let icon = type_icon(issue_type, config);
    if !config.use_colors {
        return icon.to_string();
    }
    match issue_type {
        IssueType::Bug => icon.red().to_string(),
        IssueType::Feature => icon.green().to_string(),
        IssueType::Epic => icon.magenta().bold().to_string(),
        IssueType::Task => icon.blue().to_string(),
        IssueType::Chore => icon.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::control::set_override;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static GLOBAL_STATE_MUTEX: Mutex<()> = Mutex::new(());

    struct ColorGuard<'a> {
        _guard: MutexGuard<'a, ()>,
    }

    impl ColorGuard<'_> {
        fn new() -> Self {
            let guard = GLOBAL_STATE_MUTEX
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            set_override(true);
            Self { _guard: guard }
        }
    }

    impl Drop for ColorGuard<'_> {
        fn drop(&mut self) {
            set_override(false);
        }
    }

    fn with_colors_enabled<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ColorGuard::new();
        f()
    }

    #[test]
    fn test_colorize_status_contains_ansi_codes() {
        with_colors_enabled(|| {
            let config = OutputConfig::new(80, false, true);
            for status in [
                IssueStatus::Open,
                IssueStatus::InProgress,
                IssueStatus::Blocked,
                IssueStatus::Closed,
            ] {
                let text = colorize_status(status, &config);
                assert!(text.contains(status.as_str()));
                assert!(text.contains("\x1b["), "{status} should have ANSI codes");
            }
        });
    }

    #[test]
    fn test_colorize_status_without_colors() {
        let config = OutputConfig::new(80, false, false);
        assert_eq!(colorize_status(IssueStatus::InProgress, &config), "in_progress");
    }

    #[test]
    fn test_colorize_priority_contains_ansi_codes() {
        with_colors_enabled(|| {
            let config = OutputConfig::new(80, false, true);
            let p0 = colorize_priority(0, &config);
            let p1 = colorize_priority(1, &config);
            let p2 = colorize_priority(2, &config);

            assert!(p0.contains("\x1b["), "P0 should have ANSI codes");
            assert!(p1.contains("\x1b["), "P1 should have ANSI codes");
            assert_eq!(p2, "P2");
        });
    }

    #[test]
    fn test_out_of_range_priority_renders_plainly() {
        let config = OutputConfig::new(80, false, false);
        assert_eq!(colorize_priority(9, &config), "P9");
        assert_eq!(colorize_priority(-1, &config), "P-1");
    }

    #[test]
    fn test_colorize_id_and_repo_without_colors() {
        let config = OutputConfig::new(80, false, false);
        assert_eq!(colorize_id("bd-1", &config), "bd-1");
        assert_eq!(colorize_repo("core", &config), "core");
    }

    #[test]
    fn test_ascii_fallback_icons() {
        let config = OutputConfig::new(80, true, false);

        assert_eq!(type_icon(IssueType::Task, &config), "-");
        assert_eq!(type_icon(IssueType::Bug, &config), "*");
        assert_eq!(type_icon(IssueType::Feature, &config), "+");
        assert_eq!(type_icon(IssueType::Epic, &config), "#");
        assert_eq!(type_icon(IssueType::Chore, &config), ".");
        assert_eq!(colored_status_icon(IssueStatus::Blocked, &config), "x");
        assert_eq!(colored_status_icon(IssueStatus::Open, &config), "o");
        assert_eq!(colored_status_icon(IssueStatus::Closed, &config), "+");
    }

    #[test]
    fn test_colored_type_icon_with_colors() {
        with_colors_enabled(|| {
            let config = OutputConfig::new(80, false, true);
            let epic = colored_type_icon(IssueType::Epic, &config);
            assert!(epic.contains('◆'));
            assert!(epic.contains("\x1b["));
        });
    }

    #[test]
    fn test_semantic_colors_without_colors() {
        let config = OutputConfig::new(80, false, false);
        assert_eq!(success("ready", &config), "ready");
        assert_eq!(warning("skipped", &config), "skipped");
        assert_eq!(bold("Repositories", &config), "Repositories");
        assert_eq!(dimmed("/src", &config), "/src");
        assert_eq!(cyan("->", &config), "->");
    }
}
