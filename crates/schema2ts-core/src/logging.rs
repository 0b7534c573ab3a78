//! Tracing setup for the one-shot CLI.
//!
//! Every event passing `RUST_LOG` goes to `~/.local/state/schema2ts/schema2ts.log`;
//! warnings and errors are echoed to stderr as well. When the log file cannot
//! be opened, everything goes to stderr instead.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,schema2ts=debug,schema2ts_core=debug";
const LOG_FILE_NAME: &str = "schema2ts.log";

/// Where `init` sent the log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("schema2ts")?;
    Ok(xdg_dirs.get_state_home().join("schema2ts").join(LOG_FILE_NAME))
}

/// Opens `path` for appending, creating its directory first.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log dir {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// File layer filtered by `filter`, plus a stderr layer for warnings and errors.
fn file_and_stderr(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            fmt::layer()
                .with_writer(io::stderr.with_max_level(Level::WARN))
                .without_time()
                .with_target(false),
        )
}

/// Installs the global subscriber and reports where the logs go.
/// A subscriber that is already installed is left in place.
pub fn init() -> LogTarget {
    let opened = log_file_path().and_then(|path| open_log_file(&path).map(|file| (path, file)));
    match opened {
        Ok((path, file)) => {
            let _ = file_and_stderr(file, env_filter()).try_init();
            tracing::debug!("logging to {}", path.display());
            LogTarget::File(path)
        }
        Err(e) => {
            let _ = fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .with_ansi(false)
                .try_init();
            tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
            LogTarget::Stderr
        }
    }
}
