//! VcsClient trait definition

use std::path::Path;

use async_trait::async_trait;

use super::VcsError;

/// Stateless version-control client - every call names the working copy it acts on
///
/// Calls are awaited to completion one at a time by the monitor; nothing here
/// applies a timeout, so a hung command hangs the caller.
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Fetch `branch` from `remote` without touching the working tree
    async fn fetch(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), VcsError>;

    /// Resolve a ref (e.g. `origin/main`) to its commit id
    async fn resolve_ref(&self, repo: &Path, reference: &str) -> Result<String, VcsError>;

    /// Fetch and merge `branch` from `remote`, returning the tool's summary output
    async fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<String, VcsError>;
}
