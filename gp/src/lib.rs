//! gitpuller - keep a git working copy in sync with its upstream branch
//!
//! On a fixed interval the monitor fetches the watched branch, compares the
//! remote commit with the last one it synced, and pulls when they differ.
//! Failures talking to the remote are logged and retried on the next cycle.
//!
//! # Modules
//!
//! - [`monitor`] - The polling loop and its target configuration
//! - [`vcs`] - Version-control client trait and the `git` CLI implementation
//! - [`config`] - Configuration file types and loading
//! - [`logging`] - File and console log sinks
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod vcs;

// Re-export commonly used types
pub use config::{Config, LoadedConfig, LoggingConfig, WatchConfig};
pub use error::MonitorError;
pub use monitor::{CycleOutcome, MonitorConfig, RepositoryMonitor};
pub use vcs::{GitCli, VcsClient, VcsError};
