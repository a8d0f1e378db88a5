//! gitpuller configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::monitor::{DEFAULT_BRANCH, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REMOTE, MonitorConfig};

/// Main gitpuller configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to watch and how often
    pub monitor: WatchConfig,

    /// Log sinks and level
    pub logging: LoggingConfig,
}

/// Project-local config file, looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = ".gitpuller.yml";

/// The configuration in effect and the files that were passed over to get it
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the configuration was read from; `None` means built-in defaults
    pub source: Option<PathBuf>,
    pub skipped: Vec<SkippedConfig>,
}

/// A config file that exists but could not be used
#[derive(Debug, Clone)]
pub struct SkippedConfig {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for SkippedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load config from {}: {}", self.path.display(), self.reason)
    }
}

impl Config {
    /// Resolve the configuration file
    ///
    /// An explicit path must load. Otherwise the search paths are tried in
    /// order and broken files are skipped; nothing is logged here because
    /// logging is configured from the result.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
        match explicit {
            Some(path) => {
                let config = Self::read(path).with_context(|| format!("Failed to load config from {}", path.display()))?;
                Ok(LoadedConfig {
                    config,
                    source: Some(path.to_path_buf()),
                    skipped: Vec::new(),
                })
            }
            None => Ok(Self::load_first(&Self::search_paths())),
        }
    }

    /// `./.gitpuller.yml`, then `<config_dir>/gitpuller/gitpuller.yml`
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gitpuller").join("gitpuller.yml"));
        }
        paths
    }

    /// Use the first candidate that exists and parses, falling back to defaults
    pub fn load_first(candidates: &[PathBuf]) -> LoadedConfig {
        let mut skipped = Vec::new();

        for path in candidates.iter().filter(|path| path.exists()) {
            match Self::read(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        skipped,
                    };
                }
                Err(e) => skipped.push(SkippedConfig {
                    path: path.clone(),
                    reason: format!("{:#}", e),
                }),
            }
        }

        LoadedConfig {
            config: Self::default(),
            source: None,
            skipped,
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        serde_yaml::from_str(&content).context("Failed to parse config file")
    }

    /// Apply command-line overrides; flags given on the command line win
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(branch) = &cli.branch {
            self.monitor.branch = branch.clone();
        }
        if let Some(remote) = &cli.remote {
            self.monitor.remote = remote.clone();
        }
        if let Some(interval) = cli.interval {
            self.monitor.interval_secs = interval;
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if let Some(file) = &cli.log_file {
            self.logging.file = Some(file.clone());
        }
        self
    }

    /// Target configuration for a monitor watching `repo_path`
    pub fn monitor_config(&self, repo_path: impl Into<PathBuf>) -> MonitorConfig {
        MonitorConfig::new(repo_path)
            .with_branch(self.monitor.branch.clone())
            .with_remote(self.monitor.remote.clone())
            .with_poll_interval(Duration::from_secs(self.monitor.interval_secs))
    }
}

/// Watch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Branch to monitor
    pub branch: String,

    /// Remote to fetch and pull from
    pub remote: String,

    /// Seconds between checks
    #[serde(rename = "interval-secs")]
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Persistent log file; `null` logs to the console only
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: Some(PathBuf::from("gitpuller.log")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.monitor.branch, "main");
        assert_eq!(config.monitor.remote, "origin");
        assert_eq!(config.monitor.interval_secs, 60);
        assert_eq!(config.logging.level, "INFO");
        assert_eq!(config.logging.file, Some(PathBuf::from("gitpuller.log")));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
monitor:
  branch: release
  remote: upstream
  interval-secs: 300

logging:
  level: debug
  file: /var/log/gitpuller.log
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.monitor.branch, "release");
        assert_eq!(config.monitor.remote, "upstream");
        assert_eq!(config.monitor.interval_secs, 300);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/gitpuller.log")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
monitor:
  branch: develop
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.monitor.branch, "develop");

        // Defaults for unspecified
        assert_eq!(config.monitor.remote, "origin");
        assert_eq!(config.monitor.interval_secs, 60);
        assert_eq!(config.logging.level, "INFO");
    }

    #[test]
    fn test_null_log_file_disables_file_sink() {
        let yaml = r#"
logging:
  file: null
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("gitpuller.yml");
        fs::write(&path, "monitor:\n  interval-secs: 15\n").unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.config.monitor.interval_secs, 15);
        assert_eq!(loaded.source, Some(path));
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/gitpuller.yml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load config from /nonexistent/gitpuller.yml"));
    }

    #[test]
    fn test_load_first_skips_broken_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let broken = temp_dir.path().join("broken.yml");
        let good = temp_dir.path().join("good.yml");
        fs::write(&broken, "monitor: [not, a, mapping]\n").unwrap();
        fs::write(&good, "monitor:\n  branch: develop\n").unwrap();

        let loaded = Config::load_first(&[temp_dir.path().join("absent.yml"), broken.clone(), good.clone()]);

        assert_eq!(loaded.config.monitor.branch, "develop");
        assert_eq!(loaded.source, Some(good));
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].path, broken);

        let message = loaded.skipped[0].to_string();
        assert!(message.starts_with(&format!("Failed to load config from {}: ", broken.display())));
        assert!(message.contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_first_without_files_uses_defaults() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");

        let loaded = Config::load_first(&[temp_dir.path().join("absent.yml")]);

        assert!(loaded.source.is_none());
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.config.monitor.branch, "main");
    }

    #[test]
    fn test_search_paths_start_with_local_file() {
        assert_eq!(Config::search_paths()[0], PathBuf::from(LOCAL_CONFIG_FILE));
    }

    #[test]
    fn test_cli_overrides_config() {
        let yaml = r#"
monitor:
  branch: develop
  interval-secs: 300
logging:
  level: warn
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let cli = Cli::parse_from(["gitpuller", "/srv/app", "-b", "hotfix", "--log-file", "/tmp/gp.log"]);

        let config = config.merge_cli(&cli);

        assert_eq!(config.monitor.branch, "hotfix");
        // Not given on the command line, config value kept
        assert_eq!(config.monitor.interval_secs, 300);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/gp.log")));
    }

    #[test]
    fn test_monitor_config() {
        let mut config = Config::default();
        config.monitor.interval_secs = 5;

        let target = config.monitor_config("/srv/app");
        assert_eq!(target.repo_path, PathBuf::from("/srv/app"));
        assert_eq!(target.branch, "main");
        assert_eq!(target.poll_interval, Duration::from_secs(5));
    }
}
