//! Repository monitor
//!
//! The monitor polls the remote branch on a fixed interval and pulls into
//! the working copy whenever the remote commit differs from the last one it
//! successfully synced.

mod config;
mod repository;
mod shutdown;

pub use config::{DEFAULT_BRANCH, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REMOTE, MonitorConfig};
pub use repository::{CycleOutcome, RepositoryMonitor};
