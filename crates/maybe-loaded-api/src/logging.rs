//! Logging configuration for maybe-loaded
//!
//! The library only emits `tracing` events: proxy construction at `trace`,
//! mode dispatch and store queries at `debug`. [`LogConfig`] installs a
//! subscriber for applications that do not bring their own.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "maybe-loaded.log";

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a daily-rotated file
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. `"debug"` or `"maybe_loaded=trace"`
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
    /// Info level, compact stdout output
    pub fn info() -> Self {
        Self::default()
    }

    /// Shows which operations were pushed to the store and which were emulated
    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    /// Also shows every proxy construction
    pub fn trace() -> Self {
        Self::default().with_level("trace")
    }

    /// Log to a daily-rotated file
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Log to stdout and to a daily-rotated file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// `RUST_LOG` wins over the configured level; an unparsable level
    /// falls back to `info`.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Installs the global subscriber.
    ///
    /// Returns the file writer's guard when logging to a file; keep it alive
    /// for as long as logs should be flushed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use maybe_loaded::logging::LogConfig;
    ///
    /// let _guard = LogConfig::debug().init();
    /// ```
    pub fn init(self) -> Option<WorkerGuard> {
        let filter = self.env_filter();
        let registry = tracing_subscriber::registry().with(filter);

        match (self.output, self.format) {
            (LogOutput::Stdout, LogFormat::Pretty) => {
                registry.with(fmt::layer().pretty()).init();
                None
            }
            (LogOutput::Stdout, LogFormat::Compact) => {
                registry.with(fmt::layer().compact()).init();
                None
            }
            (LogOutput::File(path), LogFormat::Pretty) => {
                let (writer, guard) = file_writer(&path);
                registry.with(fmt::layer().with_writer(writer).pretty()).init();
                Some(guard)
            }
            (LogOutput::File(path), LogFormat::Compact) => {
                let (writer, guard) = file_writer(&path);
                registry.with(fmt::layer().with_writer(writer).compact()).init();
                Some(guard)
            }
            (LogOutput::Both(path), _) => {
                let (writer, guard) = file_writer(&path);
                registry
                    .with(fmt::layer().compact())
                    .with(fmt::layer().with_writer(writer).with_ansi(false).compact())
                    .init();
                Some(guard)
            }
        }
    }
}

fn file_writer(path: &Path) -> (NonBlocking, WorkerGuard) {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);
    tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name))
}
