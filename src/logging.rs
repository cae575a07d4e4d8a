use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::dirs_home;

const LOG_ENV: &str = "TWINDIFF_LOG";
const DEFAULT_LEVEL: &str = "info";

/// `~/.cache/twindiff/twindiff.log`, or `./twindiff.log` without a home.
pub fn default_log_path() -> PathBuf {
    match dirs_home() {
        Some(home) => home.join(".cache").join("twindiff").join("twindiff.log"),
        None => PathBuf::from("twindiff.log"),
    }
}

/// Route tracing output to a file; the terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(path: Option<&Path>) -> Result<WorkerGuard> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LEVEL))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();

    tracing::info!(log = %path.display(), "twindiff starting");
    Ok(guard)
}
