//! Log sinks and subscriber construction
//!
//! Every line goes to the log file (appended, no colour) and to the console,
//! timestamped and tagged with its level. The subscriber is built as a value
//! so the binary can install it globally while tests install it per-thread
//! over a [`MemoryWriter`].

use std::fs::{self, File, OpenOptions};
use std::io;
use std::io::IsTerminal;
use std::sync::{Arc, Mutex};

use eyre::{Context, Result};
use tracing::{Level, Subscriber, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

use crate::config::LoggingConfig;

/// Parse a level name (TRACE, DEBUG, INFO, WARN, ERROR), case-insensitive
pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_uppercase().as_str() {
        "TRACE" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARN" | "WARNING" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        _ => None,
    }
}

/// Build a subscriber writing to an optional log file and a console writer
///
/// `RUST_LOG` directives are honoured on top of `level`.
pub fn build_subscriber<W>(level: Level, file: Option<File>, console: W, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let file_layer = file.map(|f| {
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(f))
            .with_ansi(false)
    });
    let console_layer = tracing_subscriber::fmt::layer().with_writer(console).with_ansi(ansi);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(file_layer)
        .with(console_layer)
}

/// Open the log file for appending, creating parent directories as needed
pub fn open_log_file(config: &LoggingConfig) -> Result<Option<File>> {
    let Some(path) = &config.file else {
        return Ok(None);
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(Some(file))
}

/// Install the process-wide subscriber described by `config`
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = match parse_level(&config.level) {
        Some(level) => level,
        None => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", config.level);
            Level::INFO
        }
    };

    let file = open_log_file(config)?;
    let ansi = io::stderr().is_terminal();
    let subscriber = build_subscriber(level, file, io::stderr, ansi);

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")?;

    debug!(?level, file = ?config.file, "Logging initialized");
    Ok(())
}

/// In-memory console sink, cloneable so a test can keep a handle while the
/// subscriber writes into it
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }

    /// Number of lines containing `needle`
    pub fn count_lines(&self, needle: &str) -> usize {
        self.contents().lines().filter(|line| line.contains(needle)).count()
    }
}

impl io::Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self.buf.lock().map_err(|_| io::Error::other("log buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
