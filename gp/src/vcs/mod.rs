//! Version-control client module
//!
//! The monitor only needs three capabilities from the version-control tool:
//! fetch a branch without merging, resolve a ref to a commit id, and pull.
//! [`VcsClient`] captures that set so the polling loop can run against the
//! real `git` binary or a scripted fake.

pub mod client;
mod error;
mod git;

pub use client::VcsClient;
pub use error::VcsError;
pub use git::GitCli;
