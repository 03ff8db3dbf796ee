//! JSON config file on the local file system.
//!
//! The file lives at a path relative to the server's working directory:
//!
//! ```text
//! <working dir>/
//!   config/
//!     staff-mode.json
//! ```
//!
//! The `config/` directory is created on first write.  There is no file
//! locking; two processes sharing the same path race on write and the last
//! one wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use staff_mode_core::domain::MODULE_ID;

use super::{ConfigStorage, StorageError};

/// Directory, relative to the working directory, holding config files.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// File name of the staff mode config inside the config directory.
pub fn config_file_name() -> String {
    format!("{MODULE_ID}.json")
}

/// Resolves the config file path inside `config_dir`.
pub fn config_file_path(config_dir: impl AsRef<Path>) -> PathBuf {
    config_dir.as_ref().join(config_file_name())
}

/// [`ConfigStorage`] backed by a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Uses the file at `path` as-is.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `<config_dir>/staff-mode.json`.
    pub fn in_dir(config_dir: impl AsRef<Path>) -> Self {
        Self::new(config_file_path(config_dir))
    }

    /// Location of the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStorage {
    /// `config/staff-mode.json` relative to the working directory.
    fn default() -> Self {
        Self::in_dir(DEFAULT_CONFIG_DIR)
    }
}

impl ConfigStorage for JsonFileStorage {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.path, contents).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
