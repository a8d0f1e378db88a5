//! CLI definition

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// gitpuller - keep a working copy in sync with its upstream branch
#[derive(Debug, Parser)]
#[command(
    name = "gitpuller",
    about = "Monitor a git repository and pull changes automatically",
    version
)]
pub struct Cli {
    /// Path to the git repository
    #[arg(value_name = "REPO_PATH")]
    pub repo_path: PathBuf,

    /// Branch to monitor (default: main)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Check interval in seconds (default: 60)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Remote to fetch and pull from (default: origin)
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Log file (default: gitpuller.log in the current directory)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// Result of checking a required tool
pub struct ToolCheck {
    pub name: &'static str,
    pub available: bool,
    pub version: Option<String>,
}

impl ToolCheck {
    /// Check if a tool is available and get its version
    pub fn check(name: &'static str, version_args: &[&str]) -> Self {
        debug!(name, ?version_args, "ToolCheck::check: called");
        let result = std::process::Command::new(name).args(version_args).output();

        match result {
            Ok(output) if output.status.success() => {
                let version_str = String::from_utf8_lossy(&output.stdout);
                Self {
                    name,
                    available: true,
                    version: Some(parse_version(&version_str)),
                }
            }
            _ => {
                debug!(name, "ToolCheck::check: tool not available");
                Self {
                    name,
                    available: false,
                    version: None,
                }
            }
        }
    }
}

/// Parse version from command output (extracts first version-like string)
fn parse_version(output: &str) -> String {
    for word in output.split_whitespace() {
        let word = word.trim_start_matches('v');
        if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            let version: String = word.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
            if !version.is_empty() {
                return version;
            }
        }
    }
    "unknown".to_string()
}

/// Generate the after_help text showing whether git is usable
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let git = ToolCheck::check("git", &["--version"]);

    let mut help = String::new();
    help.push_str("Required Tools:\n");
    let icon = if git.available { "\u{2705}" } else { "\u{274C}" };
    let version = git.version.as_deref().unwrap_or("not found");
    help.push_str(&format!("  {} {:<10} {}\n", icon, git.name, version));

    help.push('\n');
    help.push_str("Logs are appended to gitpuller.log unless --log-file or the config file says otherwise.\n");
    help
}
