//! Storage infrastructure: where the config file lives and how it is read
//! and written.
//!
//! The application layer only sees the [`ConfigStorage`] trait.  Two adapters
//! implement it:
//!
//! - [`json_file::JsonFileStorage`] – the real file at `config/staff-mode.json`
//!   (or any other path the orchestrator chooses).
//! - [`memory::MemoryStorage`] – an in-memory stand-in with switchable read and
//!   write failures, used by tests.
//!
//! Storage deals in raw text.  Parsing and serialization belong to the
//! application and domain layers so both adapters behave identically.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod json_file;
pub mod memory;

/// Error type for config storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read/write access to the single config document.
pub trait ConfigStorage {
    /// Where the document lives.  Used in log messages.
    fn location(&self) -> &Path;

    /// Returns the document text, or `None` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the document exists but cannot be read.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the document with `contents`, creating parent directories
    /// first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the directory or file cannot be written.
    fn write(&self, contents: &str) -> Result<(), StorageError>;
}
