//! The staff mode configuration record and its default values.
//!
//! [`ConfigRecord`] is the flat set of settings the rest of the server reads
//! at startup: the Discord bot credential, the two Discord channels the bot
//! posts to, the port of the bot's HTTP listener, and the file-logging
//! switches.
//!
//! # On-disk shape
//!
//! The record serializes to a single JSON object whose keys are the
//! camel-case field names:
//!
//! ```json
//! {
//!   "discordBotToken": "YOUR_DISCORD_BOT_TOKEN_HERE",
//!   "adminLogChannelId": 0,
//!   "serverStatusChannelId": 0,
//!   "discordBotHttpPort": 8080,
//!   "logToFileEnabled": true,
//!   "logFilePath": "logs/staff-mode-server.log"
//! }
//! ```
//!
//! Reading goes the other way through [`crate::domain::repair`], which
//! tolerates missing or invalid fields.  A `ConfigRecord` can only be built
//! from defaults or from that repair pass, so every record in the program
//! already satisfies the invariants below.
//!
//! # Invariants
//!
//! - `discord_bot_http_port` is never `0`.
//! - `log_file_path` is never empty.
//! - `discord_bot_token` is never empty (the placeholder stands in for "unset").

use std::fmt;
use std::num::NonZeroU64;

use serde::Serialize;

/// Stable identifier of the staff mode module.  Names the config file.
pub const MODULE_ID: &str = "staff-mode";

/// Token value written to fresh config files.  Signals "not configured yet".
pub const PLACEHOLDER_BOT_TOKEN: &str = "YOUR_DISCORD_BOT_TOKEN_HERE";

/// Port used by the bot's HTTP listener when none is configured.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Log file written when file logging is enabled and no path is configured.
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/staff-mode-server.log";

/// Channel ID value meaning "not set".
pub const UNSET_CHANNEL_ID: u64 = 0;

/// Effective staff mode configuration.
///
/// Fields are private: after the repair pass has run the record is treated
/// as immutable for the rest of the process, and consumers go through the
/// read-only accessors.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub(crate) discord_bot_token: String,
    pub(crate) admin_log_channel_id: u64,
    pub(crate) server_status_channel_id: u64,
    pub(crate) discord_bot_http_port: u16,
    pub(crate) log_to_file_enabled: bool,
    pub(crate) log_file_path: String,
}

impl Default for ConfigRecord {
    /// Returns the record written on first run.
    ///
    /// | Field                  | Default                        |
    /// |------------------------|--------------------------------|
    /// | discordBotToken        | `YOUR_DISCORD_BOT_TOKEN_HERE`  |
    /// | adminLogChannelId      | `0` (unset)                    |
    /// | serverStatusChannelId  | `0` (unset)                    |
    /// | discordBotHttpPort     | `8080`                         |
    /// | logToFileEnabled       | `true`                         |
    /// | logFilePath            | `logs/staff-mode-server.log`   |
    fn default() -> Self {
        Self {
            discord_bot_token: PLACEHOLDER_BOT_TOKEN.to_string(),
            admin_log_channel_id: UNSET_CHANNEL_ID,
            server_status_channel_id: UNSET_CHANNEL_ID,
            discord_bot_http_port: DEFAULT_HTTP_PORT,
            log_to_file_enabled: true,
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
        }
    }
}

impl ConfigRecord {
    /// The Discord bot token.  Equals [`PLACEHOLDER_BOT_TOKEN`] when unset.
    pub fn discord_bot_token(&self) -> &str {
        &self.discord_bot_token
    }

    /// Channel that receives staff action logs.  `0` when unset.
    pub fn admin_log_channel_id(&self) -> u64 {
        self.admin_log_channel_id
    }

    /// Channel that receives server status updates.  `0` when unset.
    pub fn server_status_channel_id(&self) -> u64 {
        self.server_status_channel_id
    }

    /// Port the bot's HTTP listener binds to.  Never `0`.
    pub fn discord_bot_http_port(&self) -> u16 {
        self.discord_bot_http_port
    }

    /// Whether server logs are also written to [`Self::log_file_path`].
    pub fn is_log_to_file_enabled(&self) -> bool {
        self.log_to_file_enabled
    }

    /// Path of the server log file, relative to the working directory unless
    /// absolute.  Never empty.
    pub fn log_file_path(&self) -> &str {
        &self.log_file_path
    }

    /// `true` when a real token has been configured.
    pub fn has_bot_token(&self) -> bool {
        is_configured_token(&self.discord_bot_token)
    }

    /// The admin log channel, or `None` while it is unset.
    pub fn admin_log_channel(&self) -> Option<NonZeroU64> {
        NonZeroU64::new(self.admin_log_channel_id)
    }

    /// The server status channel, or `None` while it is unset.
    pub fn server_status_channel(&self) -> Option<NonZeroU64> {
        NonZeroU64::new(self.server_status_channel_id)
    }

    /// Serializes the record as pretty-printed JSON (two-space indent).
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error.  With the field types used
    /// here this does not happen in practice, but the writer stays fallible.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Redacts the bot token so records can be logged safely.
impl fmt::Debug for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.has_bot_token() {
            "***"
        } else {
            PLACEHOLDER_BOT_TOKEN
        };
        f.debug_struct("ConfigRecord")
            .field("discord_bot_token", &token)
            .field("admin_log_channel_id", &self.admin_log_channel_id)
            .field("server_status_channel_id", &self.server_status_channel_id)
            .field("discord_bot_http_port", &self.discord_bot_http_port)
            .field("log_to_file_enabled", &self.log_to_file_enabled)
            .field("log_file_path", &self.log_file_path)
            .finish()
    }
}

/// A token counts as configured when it is non-empty and not the placeholder.
pub fn is_configured_token(token: &str) -> bool {
    !token.is_empty() && token != PLACEHOLDER_BOT_TOKEN
}

// ── Tests ─────────────────────────────────────────────────────────────────────
