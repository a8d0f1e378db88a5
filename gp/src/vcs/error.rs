//! Version-control error types

use thiserror::Error;

/// Errors returned by a [`VcsClient`](super::VcsClient)
#[derive(Debug, Error)]
pub enum VcsError {
    /// The command could not be launched at all (binary missing, bad cwd, ...)
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and reported failure
    #[error("`{command}` failed ({status})")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The command succeeded but printed nothing where output was required
    #[error("`{command}` produced no output")]
    EmptyOutput { command: String },
}

impl VcsError {
    /// Check if the command never started
    pub fn is_spawn(&self) -> bool {
        matches!(self, VcsError::Spawn { .. })
    }

    /// Captured standard error of a failed command
    pub fn stderr(&self) -> Option<&str> {
        match self {
            VcsError::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
