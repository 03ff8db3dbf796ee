//! Domain layer: the configuration record and the rules that keep it valid.
//!
//! Nothing in here touches the file system.  The server crate reads and
//! writes the config file and hands the raw text to [`repair::parse_and_repair`].

pub mod record;
pub mod repair;

pub use record::{
    ConfigRecord, DEFAULT_HTTP_PORT, DEFAULT_LOG_FILE_PATH, MODULE_ID, PLACEHOLDER_BOT_TOKEN,
};
pub use repair::{parse_and_repair, ConfigParseError, RepairFinding, Repaired, StoredConfig};
