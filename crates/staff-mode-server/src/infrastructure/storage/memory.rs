//! In-memory config storage for unit testing.
//!
//! Lets tests seed the document, inspect what was written, and simulate
//! read or write failures without touching the file system.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ConfigStorage, StorageError};

/// A [`ConfigStorage`] that keeps the document in memory.
pub struct MemoryStorage {
    location: PathBuf,
    contents: Mutex<Option<String>>,
    write_count: Mutex<u32>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStorage {
    /// Creates storage with no document, as on first run.
    pub fn new() -> Self {
        Self {
            location: PathBuf::from("memory/staff-mode.json"),
            contents: Mutex::new(None),
            write_count: Mutex::new(0),
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Creates storage that already holds `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let storage = Self::new();
        *storage.contents.lock().expect("lock poisoned") = Some(contents.into());
        storage
    }

    /// Makes every subsequent `read` fail with an I/O error.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Makes every subsequent `write` fail with an I/O error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Current document text.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().expect("lock poisoned").clone()
    }

    /// Replaces the document behind the store's back, like an operator
    /// editing the file while the server runs.
    pub fn set_contents(&self, contents: impl Into<String>) {
        *self.contents.lock().expect("lock poisoned") = Some(contents.into());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u32 {
        *self.write_count.lock().expect("lock poisoned")
    }

    fn io_error(&self, kind: io::ErrorKind) -> StorageError {
        StorageError::Io {
            path: self.location.clone(),
            source: io::Error::new(kind, "simulated storage failure"),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStorage for MemoryStorage {
    fn location(&self) -> &Path {
        &self.location
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(self.io_error(io::ErrorKind::PermissionDenied));
        }
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(self.io_error(io::ErrorKind::PermissionDenied));
        }
        *self.contents.lock().expect("lock poisoned") = Some(contents.to_string());
        *self.write_count.lock().expect("lock poisoned") += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_storage_reads_as_absent() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.read(), Ok(None)));
    }

    #[test]
    fn test_write_then_read_returns_written_text() {
        // Arrange
        let storage = MemoryStorage::new();

        // Act
        storage.write("{\"a\":1}").expect("write");

        // Assert
        assert_eq!(storage.read().expect("read").as_deref(), Some("{\"a\":1}"));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_failing_writes_leave_contents_untouched() {
        let storage = MemoryStorage::with_contents("original").failing_writes();

        assert!(storage.write("replacement").is_err());
        assert_eq!(storage.contents().as_deref(), Some("original"));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_failing_reads_return_io_error() {
        let storage = MemoryStorage::with_contents("{}").failing_reads();
        assert!(matches!(storage.read(), Err(StorageError::Io { .. })));
    }
}
