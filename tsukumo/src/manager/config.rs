//! Configuration for the package installer.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ConfigFile, DEFAULT_REPOSITORY_TIMEOUT_SECS, DEFAULT_STORE_ROOT};

/// Configuration for the package installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Directory packages are installed into.
    pub store_root: PathBuf,

    /// Base URL of the remote repository.
    ///
    /// Required for installs; an empty string counts as unset.
    pub repo_url: Option<String>,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from(DEFAULT_STORE_ROOT),
            repo_url: None,
            timeout: Duration::from_secs(DEFAULT_REPOSITORY_TIMEOUT_SECS),
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration with the given store root.
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        Self {
            store_root: store_root.into(),
            ..Default::default()
        }
    }

    /// Set the repository base URL.
    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    /// Set the store root.
    pub fn with_store_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_root = path.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The repository URL if one is configured and non-empty.
    pub fn repo_url(&self) -> Option<&str> {
        self.repo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl From<&ConfigFile> for ManagerConfig {
    fn from(config: &ConfigFile) -> Self {
        Self {
            store_root: config.store.root.clone(),
            repo_url: config.repository.url.clone(),
            timeout: Duration::from_secs(config.repository.timeout),
        }
    }
}
