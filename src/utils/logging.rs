//! Tracing setup
//!
//! The terminal belongs to the canvas while the viewer runs, so log output
//! only ever goes to a file.
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::app_paths::AppPaths;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Timestamped log file name, e.g. `csv-pager_20240131_101500.log`
pub fn log_file_name() -> String {
    format!("csv-pager_{}.log", Local::now().format("%Y%m%d_%H%M%S"))
}

/// New log file in the per-user log directory, with `latest.log` pointing at it
pub fn default_log_path() -> Result<PathBuf> {
    let log_dir = AppPaths::log_dir()?;
    let log_path = log_dir.join(log_file_name());

    #[cfg(unix)]
    {
        let latest_path = log_dir.join("latest.log");
        let _ = std::fs::remove_file(&latest_path);
        let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
    }

    Ok(log_path)
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Install the global subscriber writing to `path`. Returns the path used.
pub fn init_file_logging(path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path,
        None => default_log_path()?,
    };
    let file = open_log_file(&path)?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(target: "app", "Logging to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name();
        assert!(name.starts_with("csv-pager_"));
        assert!(name.ends_with(".log"));
        // csv-pager_ + YYYYMMDD_HHMMSS + .log
        assert_eq!(name.len(), "csv-pager_".len() + 15 + ".log".len());
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
