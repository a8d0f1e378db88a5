//! Repository monitor: the poll → compare → pull loop

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::config::MonitorConfig;
use super::shutdown::Shutdown;
use crate::error::MonitorError;
use crate::vcs::{VcsClient, VcsError};

/// Result of one check against the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Remote matches the last-known ref
    Unchanged,
    /// Fetch or resolve failed; nothing was done
    QueryFailed,
    /// Remote moved and the pull succeeded
    Synced { from: Option<String>, to: String },
    /// Remote moved but the pull failed; retried next cycle
    SyncFailed { from: Option<String>, to: String },
    /// Shutdown fired before the next git command was started
    Interrupted,
}

/// Outcome of a fetch + resolve round
enum RemoteQuery {
    Ref(String),
    Failed,
    Interrupted,
}

/// Watches one working copy and pulls whenever its remote branch moves
pub struct RepositoryMonitor {
    config: MonitorConfig,
    client: Arc<dyn VcsClient>,
    last_known_ref: Option<String>,
}

impl RepositoryMonitor {
    /// Create a monitor, failing if the target is not a usable working copy
    pub fn new(config: MonitorConfig, client: Arc<dyn VcsClient>) -> Result<Self, MonitorError> {
        debug!(?config, "RepositoryMonitor::new: called");
        let config = config.validate()?;

        info!(
            "Monitoring repository at {} on branch {}",
            config.repo_path.display(),
            config.branch
        );

        Ok(Self {
            config,
            client,
            last_known_ref: None,
        })
    }

    /// Fetch the remote branch and resolve it to a commit id
    ///
    /// Returns `Ok(None)` when git reports a failure; the caller should try
    /// again next cycle. Only a git binary that cannot be launched is an error.
    pub async fn query_remote_ref(&self) -> Result<Option<String>, MonitorError> {
        let never = std::future::pending::<()>();
        tokio::pin!(never);

        match self.query(&mut Shutdown::new(never)).await? {
            RemoteQuery::Ref(sha) => Ok(Some(sha)),
            RemoteQuery::Failed | RemoteQuery::Interrupted => Ok(None),
        }
    }

    async fn query<F>(&self, shutdown: &mut Shutdown<'_, F>) -> Result<RemoteQuery, MonitorError>
    where
        F: Future<Output = ()>,
    {
        debug!(remote_branch = %self.config.remote_branch(), "RepositoryMonitor::query: called");

        if shutdown.fired().await {
            return Ok(RemoteQuery::Interrupted);
        }

        let repo = &self.config.repo_path;
        let resolved = match self.client.fetch(repo, &self.config.remote, &self.config.branch).await {
            Ok(()) => {
                if shutdown.fired().await {
                    return Ok(RemoteQuery::Interrupted);
                }
                self.client.resolve_ref(repo, &self.config.remote_branch()).await
            }
            Err(e) => Err(e),
        };

        match resolved {
            Ok(sha) => Ok(RemoteQuery::Ref(sha)),
            Err(e) => Self::query_failed(e),
        }
    }

    fn query_failed(e: VcsError) -> Result<RemoteQuery, MonitorError> {
        if e.is_spawn() {
            return Err(MonitorError::Unexpected(e));
        }
        let err = MonitorError::RemoteQuery(e);
        error!(output = ?err.command_output().unwrap_or_default(), "{}", err);
        Ok(RemoteQuery::Failed)
    }

    /// Pull the configured branch into the working copy
    ///
    /// Returns `Ok(false)` when the pull fails; the last-known ref must not
    /// advance in that case.
    pub async fn synchronize(&self) -> Result<bool, MonitorError> {
        info!("Pulling latest changes...");

        match self
            .client
            .pull(&self.config.repo_path, &self.config.remote, &self.config.branch)
            .await
        {
            Ok(output) => {
                info!("Pull successful: {}", output);
                Ok(true)
            }
            Err(e) if e.is_spawn() => Err(MonitorError::Unexpected(e)),
            Err(e) => {
                let err = MonitorError::Sync(e);
                error!(output = ?err.command_output().unwrap_or_default(), "{}", err);
                Ok(false)
            }
        }
    }

    /// Record the remote's current ref as the starting point
    pub async fn baseline(&mut self) -> Result<Option<&str>, MonitorError> {
        let never = std::future::pending::<()>();
        tokio::pin!(never);

        self.baseline_until(&mut Shutdown::new(never)).await?;
        Ok(self.last_known_ref.as_deref())
    }

    /// Returns `false` if shutdown fired before the baseline was taken
    async fn baseline_until<F>(&mut self, shutdown: &mut Shutdown<'_, F>) -> Result<bool, MonitorError>
    where
        F: Future<Output = ()>,
    {
        self.last_known_ref = match self.query(shutdown).await? {
            RemoteQuery::Ref(sha) => {
                info!("Initial commit hash: {}", sha);
                Some(sha)
            }
            RemoteQuery::Failed => None,
            RemoteQuery::Interrupted => return Ok(false),
        };
        Ok(true)
    }

    /// Run a single query → compare → pull step, without sleeping
    pub async fn check_once(&mut self) -> Result<CycleOutcome, MonitorError> {
        let never = std::future::pending::<()>();
        tokio::pin!(never);

        self.cycle(&mut Shutdown::new(never)).await
    }

    async fn cycle<F>(&mut self, shutdown: &mut Shutdown<'_, F>) -> Result<CycleOutcome, MonitorError>
    where
        F: Future<Output = ()>,
    {
        let current = match self.query(shutdown).await? {
            RemoteQuery::Ref(sha) => sha,
            RemoteQuery::Failed => return Ok(CycleOutcome::QueryFailed),
            RemoteQuery::Interrupted => return Ok(CycleOutcome::Interrupted),
        };

        if self.last_known_ref.as_deref() == Some(current.as_str()) {
            debug!(sha = %current, "RepositoryMonitor::cycle: unchanged");
            return Ok(CycleOutcome::Unchanged);
        }

        let previous = self.last_known_ref.clone();
        info!(
            "New commit detected: {} (previous: {})",
            current,
            previous.as_deref().unwrap_or("unknown")
        );

        if shutdown.fired().await {
            return Ok(CycleOutcome::Interrupted);
        }

        if self.synchronize().await? {
            self.last_known_ref = Some(current.clone());
            Ok(CycleOutcome::Synced {
                from: previous,
                to: current,
            })
        } else {
            Ok(CycleOutcome::SyncFailed {
                from: previous,
                to: current,
            })
        }
    }

    /// Run the monitoring loop until `shutdown` resolves or an unexpected error occurs
    ///
    /// The signal is checked before every git command and during the sleep;
    /// once it has fired no further command is started. A command already
    /// running is awaited, not killed. Returns `Ok(())` after a clean stop.
    ///
    /// A terminal Ctrl+C also reaches the git child (same process group), so
    /// git may abort that command itself; a pull interrupted that way is
    /// reported like any other failed pull.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), MonitorError>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting to monitor repository for changes every {} seconds",
            self.config.poll_interval.as_secs()
        );

        tokio::pin!(shutdown);

        match self.watch(&mut Shutdown::new(shutdown)).await {
            Ok(()) => {
                info!("Monitoring stopped by user");
                Ok(())
            }
            Err(e) => {
                error!("An error occurred: {}", e);
                Err(e)
            }
        }
    }

    async fn watch<F>(&mut self, shutdown: &mut Shutdown<'_, F>) -> Result<(), MonitorError>
    where
        F: Future<Output = ()>,
    {
        if !self.baseline_until(shutdown).await? {
            return Ok(());
        }

        loop {
            let outcome = self.cycle(shutdown).await?;
            debug!(?outcome, "RepositoryMonitor::watch: cycle complete");

            if outcome == CycleOutcome::Interrupted || shutdown.sleep(self.config.poll_interval).await {
                return Ok(());
            }
        }
    }

    /// Get the last known remote ref
    pub fn last_known_ref(&self) -> Option<&str> {
        self.last_known_ref.as_deref()
    }
}
