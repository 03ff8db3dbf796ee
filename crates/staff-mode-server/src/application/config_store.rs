//! ConfigStore: load-once access to the staff mode config.
//!
//! The orchestrator builds one `ConfigStore` at startup and hands references
//! to whatever needs configuration (the HTTP listener, the Discord client, the
//! file logger).  The first call to [`ConfigStore::get`] performs the load;
//! every later call returns the same cached value without touching storage,
//! even if the file is edited in the meantime.
//!
//! The cache is a `OnceLock`, so concurrent first calls on one store still
//! load exactly once.

use std::sync::OnceLock;

use staff_mode_core::domain::ConfigRecord;

use super::load_config::{load_config, save_config, LoadedConfig};
use crate::infrastructure::storage::ConfigStorage;

/// Lazily loaded, cached configuration backed by a [`ConfigStorage`].
pub struct ConfigStore<S> {
    storage: S,
    loaded: OnceLock<LoadedConfig>,
}

impl<S: ConfigStorage> ConfigStore<S> {
    /// Wraps `storage`.  Nothing is read until the first [`get`](Self::get).
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            loaded: OnceLock::new(),
        }
    }

    /// Returns the cached load result, loading on first call.
    pub fn get(&self) -> &LoadedConfig {
        self.loaded.get_or_init(|| load_config(&self.storage))
    }

    /// Shorthand for `get().record`.
    pub fn config(&self) -> &ConfigRecord {
        &self.get().record
    }

    /// Writes `record` to storage.  Errors are logged, not returned.
    ///
    /// The cached record is not replaced; the new values take effect on the
    /// next process start.
    pub fn save(&self, record: &ConfigRecord) -> bool {
        save_config(&self.storage, record)
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::load_config::LoadProvenance;
    use crate::infrastructure::storage::memory::MemoryStorage;

    #[test]
    fn test_get_loads_lazily() {
        // Arrange
        let store = ConfigStore::new(MemoryStorage::new());

        // Assert – nothing written until first access
        assert_eq!(store.storage().write_count(), 0);

        // Act
        let loaded = store.get();

        // Assert
        assert_eq!(loaded.provenance, LoadProvenance::CreatedDefault);
        assert_eq!(store.storage().write_count(), 1);
    }

    #[test]
    fn test_get_returns_same_cached_value() {
        let store = ConfigStore::new(MemoryStorage::new());

        let first: *const LoadedConfig = store.get();
        let second: *const LoadedConfig = store.get();

        assert!(std::ptr::eq(first, second));
        assert_eq!(store.storage().write_count(), 1, "second get must not reload");
    }

    #[test]
    fn test_get_ignores_external_edits_after_first_load() {
        // Arrange
        let store = ConfigStore::new(MemoryStorage::new());
        let before = store.get().record.clone();

        // Act – operator edits the file while the server runs
        store
            .storage()
            .set_contents(r#"{ "discordBotHttpPort": 9999, "logFilePath": "x.log" }"#);
        let after = store.config();

        // Assert
        assert_eq!(&before, after);
        assert_eq!(after.discord_bot_http_port(), 8080);
    }

    #[test]
    fn test_save_writes_but_keeps_cached_record() {
        // Arrange
        let store = ConfigStore::new(MemoryStorage::with_contents(
            r#"{ "discordBotToken": "t", "adminLogChannelId": 1, "serverStatusChannelId": 2,
                 "discordBotHttpPort": 9000, "logToFileEnabled": false, "logFilePath": "a.log" }"#,
        ));
        let cached = store.config().clone();

        // Act
        let saved = store.save(&ConfigRecord::default());

        // Assert
        assert!(saved);
        assert_eq!(store.config(), &cached);
        assert_eq!(
            store.storage().contents(),
            Some(ConfigRecord::default().to_pretty_json().unwrap())
        );
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let store = ConfigStore::new(MemoryStorage::new().failing_writes());
        assert!(!store.save(&ConfigRecord::default()));
        // The store is still usable.
        assert_eq!(store.config(), &ConfigRecord::default());
    }
}
