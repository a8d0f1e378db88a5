//! Monitor error types

use std::path::PathBuf;
use thiserror::Error;

use crate::vcs::VcsError;

/// Errors that can occur while constructing or running a repository monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("The path {path} is not a git repository")]
    NotARepository { path: PathBuf },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Error getting latest commit hash: {0}")]
    RemoteQuery(#[source] VcsError),

    #[error("Error pulling changes: {0}")]
    Sync(#[source] VcsError),

    #[error("Unexpected error: {0}")]
    Unexpected(#[source] VcsError),
}

impl MonitorError {
    /// Diagnostic output captured from the git command, if any
    pub fn command_output(&self) -> Option<&str> {
        match self {
            MonitorError::RemoteQuery(e) | MonitorError::Sync(e) | MonitorError::Unexpected(e) => e.stderr(),
            _ => None,
        }
    }
}
