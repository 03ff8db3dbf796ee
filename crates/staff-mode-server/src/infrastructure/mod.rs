//! Infrastructure layer for the staff mode server.
//!
//! Contains OS-facing adapters: config file storage and the logging setup.
//!
//! **Dependency rule**: this layer may depend on `staff_mode_core`, but MUST
//! NOT be imported by the domain layer.  The application layer only uses the
//! [`storage::ConfigStorage`] trait.

pub mod logging;
pub mod storage;
