//! Log output setup.
//!
//! Text mode logs to stderr next to the plain-text display. The terminal
//! UI owns the whole TTY, so in that mode logs go to a file instead.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::Result;
use crate::app::DisplayMode;
use crate::error::TickerError;

/// Default log file used while the terminal UI is active.
pub const DEFAULT_LOG_FILE: &str = "tickerwheel.log";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

impl LogSink {
    /// Picks the sink that does not collide with `mode`'s display.
    #[must_use]
    pub fn for_mode(mode: DisplayMode, log_file: &Path) -> Self {
        match mode {
            DisplayMode::Text => Self::Stderr,
            DisplayMode::Graphical => Self::File(log_file.to_path_buf()),
        }
    }

    /// Opens the sink behind a background writer.
    ///
    /// Log lines are flushed when the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Io`] if the log file cannot be created.
    pub fn writer(&self) -> Result<(NonBlocking, WorkerGuard)> {
        match self {
            Self::Stderr => Ok(tracing_appender::non_blocking(std::io::stderr())),
            Self::File(path) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let name = path
                    .file_name()
                    .ok_or_else(|| {
                        TickerError::Io(format!("log file {} has no file name", path.display()))
                    })?
                    .to_string_lossy()
                    .into_owned();

                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::NEVER)
                    .filename_prefix(name)
                    .build(dir)
                    .map_err(|e| {
                        TickerError::Io(format!("failed to open log file {}: {e}", path.display()))
                    })?;
                Ok(tracing_appender::non_blocking(appender))
            }
        }
    }
}

/// Installs the global subscriber writing to `sink`.
///
/// `RUST_LOG` overrides the default `info` filter. Keep the returned guard
/// alive for as long as logs should be written.
///
/// # Errors
///
/// Returns [`TickerError::Io`] if the sink cannot be opened.
pub fn init(sink: &LogSink) -> Result<WorkerGuard> {
    let (writer, guard) = sink.writer()?;
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(matches!(sink, LogSink::Stderr))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    Ok(guard)
}
