//! Monitor target configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::MonitorError;

/// Default branch to watch
pub const DEFAULT_BRANCH: &str = "main";

/// Default remote to fetch and pull from
pub const DEFAULT_REMOTE: &str = "origin";

/// Default seconds between checks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// What the monitor watches and how often. Fixed once the monitor is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Working copy to keep in sync
    pub repo_path: PathBuf,

    /// The branch name to watch
    pub branch: String,

    /// The remote name
    pub remote: String,

    /// Delay between the end of one cycle and the start of the next
    pub poll_interval: Duration,
}

impl MonitorConfig {
    /// Config for `repo_path` with default branch, remote and interval
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            branch: DEFAULT_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Get the full remote branch reference
    pub fn remote_branch(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    /// Check the invariants and make the repository path absolute
    pub fn validate(mut self) -> Result<Self, MonitorError> {
        debug!(?self, "MonitorConfig::validate: called");

        if self.branch.trim().is_empty() {
            return Err(MonitorError::Configuration("branch name must not be empty".to_string()));
        }
        if self.remote.trim().is_empty() {
            return Err(MonitorError::Configuration("remote name must not be empty".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(MonitorError::Configuration("poll interval must be positive".to_string()));
        }

        self.repo_path = std::path::absolute(&self.repo_path).map_err(|e| {
            MonitorError::Configuration(format!("cannot resolve {}: {}", self.repo_path.display(), e))
        })?;

        if !is_working_copy(&self.repo_path) {
            debug!(repo_path = ?self.repo_path, "MonitorConfig::validate: no .git entry");
            return Err(MonitorError::NotARepository { path: self.repo_path });
        }

        Ok(self)
    }
}

/// A `.git` directory, or the `.git` file a linked worktree or submodule uses
fn is_working_copy(path: &Path) -> bool {
    path.join(".git").exists()
}
