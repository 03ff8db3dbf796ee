//! Application layer use cases for the staff mode server.
//!
//! # Sub-modules
//!
//! - **`load_config`** – Reads the stored config, runs the repair pass, and
//!   writes the file back when something was repaired or regenerated.
//!   Never fails; reports how the result was obtained.
//!
//! - **`config_store`** – Caches the first load for the rest of the process
//!   so every consumer sees the same values.

pub mod config_store;
pub mod load_config;

pub use config_store::ConfigStore;
pub use load_config::{load_config, save_config, LoadProvenance, LoadedConfig};
