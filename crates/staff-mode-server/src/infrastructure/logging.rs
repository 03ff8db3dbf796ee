//! Logging setup for the server process.
//!
//! Logging starts in two phases because the config decides where logs go,
//! while loading the config already produces log lines worth seeing:
//!
//! 1. [`bootstrap_subscriber`] – a stderr-only subscriber, installed as the
//!    thread default just for the duration of the config load.
//! 2. [`init_logging`] – the process-wide subscriber: stderr plus, when
//!    `logToFileEnabled` is set, a plain-text copy appended to `logFilePath`.
//!
//! The level is controlled by `RUST_LOG` and falls back to `info`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use staff_mode_core::domain::ConfigRecord;
use thiserror::Error;
use tracing::{info, warn, Subscriber};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error type for logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file or its directory could not be created.
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// `RUST_LOG` if set and valid, otherwise `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Stderr-only subscriber used while the config is being loaded.
pub fn bootstrap_subscriber() -> impl Subscriber + Send + Sync {
    fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .finish()
}

/// The log file path, if `record` asks for file logging.
pub fn log_file_target(record: &ConfigRecord) -> Option<PathBuf> {
    record
        .is_log_to_file_enabled()
        .then(|| PathBuf::from(record.log_file_path()))
}

/// Opens `path` for appending, creating it and its parent directories.
///
/// # Errors
///
/// Returns [`LoggingError::OpenLogFile`] on any I/O failure.
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let open_err = |source| LoggingError::OpenLogFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(open_err)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)
}

/// Installs the process-wide subscriber described by `record`.
///
/// A log file that cannot be opened does not fail startup: logging continues
/// on stderr and a warning names the file.
///
/// # Errors
///
/// Returns [`LoggingError::Install`] if a global subscriber is already set.
pub fn init_logging(record: &ConfigRecord) -> Result<(), LoggingError> {
    let target = log_file_target(record);
    let (file, file_error) = match target.as_deref().map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let file_layer = file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    match (file_error, target) {
        (Some(e), _) => warn!("file logging disabled: {e}"),
        (None, Some(path)) => info!("logging to file {}", path.display()),
        (None, None) => info!("file logging disabled by config"),
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
