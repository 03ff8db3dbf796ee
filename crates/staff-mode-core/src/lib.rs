//! # staff-mode-core
//!
//! Shared configuration types for the staff mode server.
//!
//! The staff mode server connects a game server's moderation tooling to a
//! Discord bot.  Its behaviour is driven by one small JSON file; this crate
//! defines what that file contains and how a damaged or incomplete file is
//! turned back into a usable configuration:
//!
//! - **`domain::record`** – [`ConfigRecord`], its defaults, and the read-only
//!   accessors consumed by the HTTP server, the Discord client, and the file
//!   logger.
//!
//! - **`domain::repair`** – the lenient on-disk shape and the field-by-field
//!   repair pass that replaces missing or invalid values with defaults.
//!
//! Loading, saving, and caching live in the `staff-mode-server` crate.

pub mod domain;

pub use domain::record::ConfigRecord;
pub use domain::repair::{parse_and_repair, ConfigParseError, RepairFinding, Repaired};
