//! Shared logging utilities for the Gridwatch binary.
//!
//! Log lines go two places: a size-capped rolling file under the Gridwatch
//! home directory (the daemon's durable record) and stderr (what the
//! operator watches in the foreground).

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "gridwatch=info,gridwatch_core=info,gridwatch_sheets=info";
const VERBOSE_LOG_FILTER: &str = "gridwatch=debug,gridwatch_core=debug,gridwatch_sheets=debug";
const LOG_BASE_NAME: &str = "gridwatch";
const MAX_LOG_FILES: usize = 4;
const MAX_LOG_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Initialize tracing with a rolling file writer and a stderr layer.
///
/// `RUST_LOG` overrides the filter; otherwise `verbose` picks between the
/// info and debug defaults. Both layers share the same filter so the file
/// never records less than the operator saw.
pub fn init_logging(verbose: bool) -> Result<()> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let file_writer =
        SharedRollingWriter::new(log_dir).context("Failed to initialize rolling log writer")?;

    let default_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(stderr_filter),
        )
        .init();

    Ok(())
}

/// Gridwatch home directory: ~/.gridwatch (override via GRIDWATCH_HOME)
pub fn gridwatch_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("GRIDWATCH_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gridwatch")
}

/// Logs directory: ~/.gridwatch/logs
pub fn logs_dir() -> PathBuf {
    gridwatch_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

struct RollingFileAppender {
    dir: PathBuf,
    file: Option<File>,
    current_size: u64,
}

impl RollingFileAppender {
    fn new(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let mut appender = Self {
            dir,
            file: None,
            current_size: 0,
        };
        appender.reopen()?;
        if appender.current_size > MAX_LOG_FILE_SIZE {
            appender.rotate()?;
        }
        Ok(appender)
    }

    fn reopen(&mut self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_path())?;
        self.current_size = file.metadata()?.len();
        self.file = Some(file);
        Ok(())
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{LOG_BASE_NAME}.log"))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{LOG_BASE_NAME}.log.{index}"))
    }

    /// Shift gridwatch.log -> .1 -> .2 ... dropping the oldest.
    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        let oldest = self.rotated_path(MAX_LOG_FILES - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..MAX_LOG_FILES - 1).rev() {
            let src = self.rotated_path(index);
            if src.exists() {
                fs::rename(&src, self.rotated_path(index + 1))?;
            }
        }
        let current = self.current_path();
        if current.exists() {
            fs::rename(&current, self.rotated_path(1))?;
        }

        self.reopen()
    }
}

impl Write for RollingFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.current_size + buf.len() as u64 > MAX_LOG_FILE_SIZE {
            self.rotate()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        let bytes = file.write(buf)?;
        self.current_size += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

#[derive(Clone)]
struct SharedRollingWriter {
    inner: Arc<Mutex<RollingFileAppender>>,
}

impl SharedRollingWriter {
    fn new(dir: PathBuf) -> Result<Self> {
        let appender = RollingFileAppender::new(dir).context("Failed to open log file")?;
        Ok(Self {
            inner: Arc::new(Mutex::new(appender)),
        })
    }
}

struct SharedRollingWriterGuard {
    inner: Arc<Mutex<RollingFileAppender>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedRollingWriter {
    type Writer = SharedRollingWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedRollingWriterGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for SharedRollingWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.flush()
    }
}
