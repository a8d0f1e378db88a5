//! gitpuller - poll a working copy's upstream branch and pull on change
//!
//! CLI entry point.

use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, error, info, warn};

use gitpuller::cli::{Cli, generate_after_help};
use gitpuller::config::Config;
use gitpuller::logging;
use gitpuller::monitor::RepositoryMonitor;
use gitpuller::vcs::GitCli;

/// Resolves on SIGINT or SIGTERM
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => debug!("shutdown_signal: SIGINT received"),
            _ = sigterm.recv() => {
                debug!("shutdown_signal: SIGTERM received");
                warn!("SIGTERM received");
            }
        }
    })
}

/// Resolves on Ctrl+C
#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Build command with dynamic after_help that shows whether git is available
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let loaded = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = loaded.config.merge_cli(&cli);

    logging::init(&config.logging).context("Failed to setup logging")?;
    for skipped in &loaded.skipped {
        warn!("{}", skipped);
    }
    debug!(source = ?loaded.source, ?config, "main: configuration resolved");

    let client = Arc::new(GitCli::new());
    let mut monitor = match RepositoryMonitor::new(config.monitor_config(&cli.repo_path), client) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Cannot start monitoring");
        }
    };

    let shutdown = shutdown_signal().context("Failed to install signal handlers")?;
    info!("Press Ctrl+C to stop");

    match monitor.run(shutdown).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already logged by the monitor
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
