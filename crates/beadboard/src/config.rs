//! Configuration for beadboard.
//!
//! Scan roots and remote API settings are always passed in explicitly; the
//! loaders never consult the process environment or guess at home-directory
//! conventions. The CLI builds a [`Config`] from an optional YAML file and
//! then applies command-line overrides on top.
//!
//! ```yaml
//! scan:
//!   roots: [/home/me/code]
//!   max-depth: 5
//! remote:
//!   api-url: https://api.github.com
//!   per-page: 100
//!   concurrency: 8
//!   timeout-secs: 30
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Default maximum directory depth below each scan root
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Default base URL of the hosted source-control API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size the repository listing endpoint accepts
pub const MAX_PER_PAGE: u32 = 100;

/// Default number of repositories probed at once by the remote loader
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Filesystem scan settings
    pub scan: ScanConfig,

    /// Remote API settings
    pub remote: RemoteConfig,
}

/// Filesystem scan settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScanConfig {
    /// Root directories to search for repositories
    pub roots: Vec<PathBuf>,

    /// How many directory levels below a root to descend
    pub max_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RemoteConfig {
    /// Base URL of the API
    pub api_url: String,

    /// Page size for repository enumeration (capped at [`MAX_PER_PAGE`])
    pub per_page: u32,

    /// Number of repositories probed concurrently
    pub concurrency: usize,

    /// Per-repository timeout in seconds; no timeout when absent
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            per_page: MAX_PER_PAGE,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: None,
        }
    }
}

impl RemoteConfig {
    /// Page size clamped to what the API accepts
    #[must_use]
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Per-repository timeout, if configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if it
    /// is not valid configuration YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid configuration YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}
