//! VcsClient backed by the `git` command-line tool

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{VcsClient, VcsError};

/// Runs `git` as a subprocess with the working copy as its current directory
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use the `git` found on PATH
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        let program = program.into();
        debug!(%program, "GitCli::with_program: called");
        Self { program }
    }

    /// Run a git command, returning trimmed stdout on success
    async fn run(&self, repo: &Path, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!(%command, ?repo, "GitCli::run: called");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(repo)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            debug!(%command, status = %output.status, "GitCli::run: command failed");
            return Err(VcsError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VcsClient for GitCli {
    async fn fetch(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), VcsError> {
        debug!(%remote, %branch, "GitCli::fetch: called");
        self.run(repo, &["fetch", remote, branch]).await?;
        Ok(())
    }

    async fn resolve_ref(&self, repo: &Path, reference: &str) -> Result<String, VcsError> {
        debug!(%reference, "GitCli::resolve_ref: called");
        let sha = self.run(repo, &["rev-parse", reference]).await?;
        if sha.is_empty() {
            return Err(VcsError::EmptyOutput {
                command: format!("{} rev-parse {}", self.program, reference),
            });
        }
        Ok(sha)
    }

    async fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<String, VcsError> {
        debug!(%remote, %branch, "GitCli::pull: called");
        self.run(repo, &["pull", remote, branch]).await
    }
}
