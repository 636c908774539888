//! Application context for CLI command execution.
//!
//! `App` owns the one [`RepositorySource`] chosen for this invocation.
//! Commands only ever see the loaded [`LoadReport`], never which loader
//! produced it.

use crate::config::{Config, ScanConfig};
use crate::error::{Error, Result};
use crate::source::filesystem::FilesystemSource;
use crate::source::remote::{AccessToken, GitHubClient, RemoteSource};
use crate::source::{LoadReport, RepositorySource};
use std::path::PathBuf;
use tracing::debug;

/// How the caller asked for repositories to be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// Scan local directories. Empty roots fall back to the configuration.
    Filesystem {
        /// Roots given on the command line
        roots: Vec<PathBuf>,
        /// Depth override
        max_depth: Option<usize>,
    },

    /// Query the GitHub API with the given credential.
    GitHub {
        /// Raw token, if any was supplied
        token: Option<String>,
    },
}

/// Application context for CLI operations.
pub struct App {
    source: Box<dyn RepositorySource>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("source", &self.source.describe())
            .finish()
    }
}

impl App {
    /// Wrap an already-built source.
    #[must_use]
    pub fn new(source: Box<dyn RepositorySource>) -> Self {
        Self { source }
    }

    /// Build the source the caller selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a filesystem scan has no roots, and
    /// [`Error::Unauthorized`] when the GitHub loader has no usable token.
    pub fn from_selection(selection: SourceSelection, config: &Config) -> Result<Self> {
        let source: Box<dyn RepositorySource> = match selection {
            SourceSelection::Filesystem { roots, max_depth } => {
                let scan = ScanConfig {
                    roots: if roots.is_empty() {
                        config.scan.roots.clone()
                    } else {
                        roots
                    },
                    max_depth: max_depth.unwrap_or(config.scan.max_depth),
                };
                if scan.roots.is_empty() {
                    return Err(Error::Config(
                        "no scan roots: pass --root or set scan.roots in the config file"
                            .to_string(),
                    ));
                }
                Box::new(FilesystemSource::from_config(&scan))
            }
            SourceSelection::GitHub { token } => {
                let token = AccessToken::new(token.unwrap_or_default())?;
                let client = GitHubClient::from_config(token, &config.remote)?;
                Box::new(RemoteSource::from_config(client, &config.remote))
            }
        };

        debug!(source = %source.describe(), "Selected repository source");
        Ok(Self { source })
    }

    /// Load every repository from the selected source.
    ///
    /// # Errors
    ///
    /// Propagates authentication failures from the source.
    pub async fn load(&self) -> Result<LoadReport> {
        self.source.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn filesystem_without_roots_is_a_config_error() {
        let result = App::from_selection(
            SourceSelection::Filesystem {
                roots: vec![],
                max_depth: None,
            },
            &Config::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn github_without_token_is_unauthorized() {
        let result = App::from_selection(SourceSelection::GitHub { token: None }, &Config::default());
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn configured_roots_are_used_when_none_given() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.scan.roots = vec![temp.path().to_path_buf()];

        let app = App::from_selection(
            SourceSelection::Filesystem {
                roots: vec![],
                max_depth: None,
            },
            &config,
        )
        .unwrap();

        let report = app.load().await.unwrap();
        assert!(report.data.repositories.is_empty());
        assert!(report.skipped.is_empty());
    }
}
