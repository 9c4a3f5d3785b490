//! Where `tracing` output goes: an append-only log file, or stderr when the
//! file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,trayrepo_core=debug,trayrepo=debug";

pub const LOG_FILE_NAME: &str = "trayrepo.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/trayrepo/trayrepo.log`; the directory is created if needed.
pub fn default_log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("trayrepo")?;
    xdg_dirs
        .place_state_file(LOG_FILE_NAME)
        .context("failed to create log directory")
}

/// Destination chosen for log events.
#[derive(Debug)]
pub enum LogSink {
    File { path: PathBuf, file: File },
    Stderr { reason: anyhow::Error },
}

impl LogSink {
    /// Open `log_file` (or [`default_log_path`]) for appending, falling back to stderr.
    pub fn open(log_file: Option<&Path>) -> Self {
        match open_log_file(log_file) {
            Ok((path, file)) => LogSink::File { path, file },
            Err(reason) => LogSink::Stderr { reason },
        }
    }
}

fn open_log_file(log_file: Option<&Path>) -> Result<(PathBuf, File)> {
    let path = match log_file {
        Some(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            p.to_path_buf()
        }
        None => default_log_path()?,
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok((path, file))
}

/// Install the global fmt subscriber writing to `sink`. Call once per process.
pub fn init_logging(sink: LogSink) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false);
    match sink {
        LogSink::File { path, file } => {
            builder.with_writer(Mutex::new(file)).init();
            tracing::debug!("logging to {}", path.display());
        }
        LogSink::Stderr { reason } => {
            builder.with_writer(io::stderr).init();
            tracing::warn!("log file unavailable, logging to stderr: {:#}", reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_path_creates_parent_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("trayrepo.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "earlier\n").unwrap();

        match LogSink::open(Some(&path)) {
            LogSink::File { path: p, mut file } => {
                assert_eq!(p, path);
                writeln!(file, "later").unwrap();
            }
            LogSink::Stderr { reason } => panic!("expected file sink: {reason:#}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("x.log");
        assert!(matches!(LogSink::open(Some(&path)), LogSink::File { .. }));
        assert!(path.exists());
    }

    #[test]
    fn unopenable_path_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        match LogSink::open(Some(&blocker.join("trayrepo.log"))) {
            LogSink::Stderr { reason } => {
                assert!(format!("{reason:#}").contains("not-a-dir"), "got: {reason:#}");
            }
            LogSink::File { path, .. } => panic!("unexpected file sink at {}", path.display()),
        }
    }

    #[test]
    fn default_path_is_directly_under_state_home() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_STATE_HOME", dir.path());
        let path = default_log_path().unwrap();
        std::env::remove_var("XDG_STATE_HOME");

        assert_eq!(path, dir.path().join("trayrepo").join(LOG_FILE_NAME));
        assert!(path.parent().unwrap().is_dir());
    }
}
