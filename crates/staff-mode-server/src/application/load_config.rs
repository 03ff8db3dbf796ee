//! LoadConfigUseCase: read, repair, and persist the staff mode config.
//!
//! # Load paths
//!
//! ```text
//!                    ┌─ absent ──────────────► defaults, save ──► CreatedDefault
//! storage.read() ────┼─ unreadable/bad JSON ─► defaults, save ──► FellBackToDefault
//!                    └─ parsed ─► repair ─┬─ nothing altered ───► LoadedClean
//!                                         └─ altered, save ─────► LoadedAndRepaired
//! ```
//!
//! Loading never fails.  Every error ends in a usable in-memory record; the
//! log stream and [`LoadedConfig::provenance`] say which path was taken, and
//! [`LoadedConfig::persisted`] says whether the file on disk matches.
//!
//! A malformed file is overwritten with defaults.  No backup is kept.

use staff_mode_core::domain::{ConfigParseError, ConfigRecord, RepairFinding, Repaired};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::infrastructure::storage::{ConfigStorage, StorageError};

/// How the effective config came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProvenance {
    /// No config file existed; defaults were generated.
    CreatedDefault,
    /// The file parsed and every field was valid.
    LoadedClean,
    /// The file parsed but at least one field had to be replaced.
    LoadedAndRepaired,
    /// The file could not be read or parsed; defaults replaced it.
    FellBackToDefault,
}

/// Result of a load: the record plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub record: ConfigRecord,
    pub provenance: LoadProvenance,
    /// Checks of the repair pass that fired.  Empty unless the file parsed.
    pub findings: Vec<RepairFinding>,
    /// `false` when a write was needed and failed.
    pub persisted: bool,
}

/// Internal failure while reading the stored config.  Logged, never returned.
#[derive(Debug, Error)]
enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Parse(#[from] ConfigParseError),
}

/// Failure while writing the config.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The record could not be serialized to JSON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The serialized record could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Loads the config from `storage`, repairing or regenerating it as needed.
pub fn load_config<S: ConfigStorage + ?Sized>(storage: &S) -> LoadedConfig {
    let path = storage.location().display();

    match read_stored(storage) {
        Ok(None) => {
            info!("config file not found at {path}; creating default config");
            fresh_defaults(storage, LoadProvenance::CreatedDefault)
        }
        Ok(Some(repaired)) => {
            info!("loaded config from {path}");
            for finding in &repaired.findings {
                warn!("{finding} ({path})");
            }

            let changed = repaired.changed();
            let Repaired { record, findings } = repaired;
            if changed {
                let persisted = save_config(storage, &record);
                LoadedConfig {
                    record,
                    provenance: LoadProvenance::LoadedAndRepaired,
                    findings,
                    persisted,
                }
            } else {
                LoadedConfig {
                    record,
                    provenance: LoadProvenance::LoadedClean,
                    findings,
                    persisted: true,
                }
            }
        }
        Err(e) => {
            error!("error loading config from {path}; creating new config: {e}");
            fresh_defaults(storage, LoadProvenance::FellBackToDefault)
        }
    }
}

/// Writes `record` to `storage`, logging the outcome.
///
/// Errors are logged and swallowed.  Returns whether the write landed.
pub fn save_config<S: ConfigStorage + ?Sized>(storage: &S, record: &ConfigRecord) -> bool {
    let path = storage.location().display();
    match try_save_config(storage, record) {
        Ok(()) => {
            info!("saved config to {path}");
            true
        }
        Err(e) => {
            error!("error saving config to {path}: {e}");
            false
        }
    }
}

/// Writes `record` to `storage` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`SaveError::Serialize`] if serialization fails or
/// [`SaveError::Storage`] if the write fails.
pub fn try_save_config<S: ConfigStorage + ?Sized>(
    storage: &S,
    record: &ConfigRecord,
) -> Result<(), SaveError> {
    let content = record.to_pretty_json()?;
    storage.write(&content)?;
    Ok(())
}

fn read_stored<S: ConfigStorage + ?Sized>(storage: &S) -> Result<Option<Repaired>, LoadError> {
    match storage.read()? {
        Some(text) => Ok(Some(staff_mode_core::parse_and_repair(&text)?)),
        None => Ok(None),
    }
}

fn fresh_defaults<S: ConfigStorage + ?Sized>(
    storage: &S,
    provenance: LoadProvenance,
) -> LoadedConfig {
    let record = ConfigRecord::default();
    let persisted = save_config(storage, &record);
    LoadedConfig {
        record,
        provenance,
        findings: Vec::new(),
        persisted,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
