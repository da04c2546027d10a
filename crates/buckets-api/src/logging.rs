//! Logging setup for applications using buckets.
//!
//! The library itself only emits `tracing` events (database open/close,
//! bucket creation/deletion, batch writes, lock waits). This module wires a
//! `tracing-subscriber` registry to stdout, a daily-rolling file, or both.

use std::path::{Path, PathBuf};

use buckets_core::{Error, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name used when the configured path has none
const DEFAULT_LOG_FILE: &str = "buckets.log";

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a daily-rolling file
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Multi-line human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `buckets=debug`
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Info level to stdout
    pub fn info() -> Self {
        Self::default()
    }

    /// Debug level to stdout; shows batch writes and lock retries
    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    /// Warn level to stdout
    pub fn warn() -> Self {
        Self::default().with_level("warn")
    }

    /// Write logs to a daily-rolling file instead of stdout
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Write logs to stdout and a daily-rolling file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the filter directive
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| Error::InvalidInput(format!("invalid log filter {:?}: {}", self.level, e)))
    }

    /// Installs the global subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured level. For file
    /// output the returned guard must be kept alive: dropping it stops the
    /// background writer.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the filter cannot be parsed, and
    /// `Error::Logging` if a global subscriber is already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use buckets::logging::LogConfig;
    ///
    /// let _guard = LogConfig::info().init()?;
    /// # Ok::<(), buckets::Error>(())
    /// ```
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let filter = self.filter()?;
        let already_set = |e: tracing_subscriber::util::TryInitError| {
            Error::Logging(format!("a global subscriber is already installed: {}", e))
        };

        match self.output {
            LogOutput::Stdout => {
                let installed = match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .try_init(),
                };
                installed.map_err(already_set)?;
                Ok(None)
            }
            LogOutput::File(path) => {
                let (writer, guard) = tracing_appender::non_blocking(rolling_file(&path));
                let installed = match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().with_writer(writer).with_ansi(false).pretty())
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().with_writer(writer).with_ansi(false).compact())
                        .try_init(),
                };
                installed.map_err(already_set)?;
                Ok(Some(guard))
            }
            LogOutput::Both(path) => {
                let (writer, guard) = tracing_appender::non_blocking(rolling_file(&path));
                // One format for both sinks; per-sink formats would need boxed layers.
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .with(fmt::layer().with_writer(writer).with_ansi(false).compact())
                    .try_init()
                    .map_err(already_set)?;
                Ok(Some(guard))
            }
        }
    }
}

fn rolling_file(path: &Path) -> tracing_appender::rolling::RollingFileAppender {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);
    tracing_appender::rolling::daily(dir, file_name)
}
