//! The repair pass: turns whatever is on disk into a valid [`ConfigRecord`].
//!
//! Config files are edited by hand, so the reader is deliberately lenient.
//! [`StoredConfig`] accepts any subset of the known keys (a missing key and a
//! JSON `null` read the same way) and ignores unknown keys.  [`repair`] then
//! walks the fields one by one and records a [`RepairFinding`] for each check
//! that fires:
//!
//! | Field                 | Trigger                          | Action                   | Alters value |
//! |-----------------------|----------------------------------|--------------------------|--------------|
//! | discordBotToken       | missing or empty                 | reset to placeholder     | yes          |
//! | discordBotToken       | equals placeholder               | none                     | no           |
//! | adminLogChannelId     | missing or `0`                   | leave as `0`             | no           |
//! | adminLogChannelId     | negative                         | read as `0`              | no           |
//! | adminLogChannelId     | fractional or above `u64::MAX`   | set to `0`               | yes          |
//! | serverStatusChannelId | (same three rows as above)       |                          |              |
//! | discordBotHttpPort    | missing, `0`, or not a TCP port  | set to `8080`            | yes          |
//! | logToFileEnabled      | missing                          | read as `false`          | no           |
//! | logFilePath           | missing or empty                 | set to default path      | yes          |
//!
//! Only findings that alter a value mark the record as changed; the caller
//! uses that to decide whether the file needs rewriting.

use std::fmt;

use serde::Deserialize;
use serde_json::Number;
use thiserror::Error;

use super::record::{
    ConfigRecord, DEFAULT_HTTP_PORT, DEFAULT_LOG_FILE_PATH, PLACEHOLDER_BOT_TOKEN,
    UNSET_CHANNEL_ID,
};

/// The config file content could not be parsed as a staff mode config object.
#[derive(Debug, Error)]
#[error("failed to parse config JSON: {0}")]
pub struct ConfigParseError(#[from] pub serde_json::Error);

/// Lenient view of the config file as written by a human.
///
/// Every field is optional.  Numeric fields are read wider than their record
/// type so that one bad number is repaired instead of rejecting the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    pub discord_bot_token: Option<String>,
    pub admin_log_channel_id: Option<Number>,
    pub server_status_channel_id: Option<Number>,
    pub discord_bot_http_port: Option<i64>,
    pub log_to_file_enabled: Option<bool>,
    pub log_file_path: Option<String>,
}

impl StoredConfig {
    /// Parses the raw file content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError`] when the text is not a JSON object or a
    /// known key holds a value of the wrong type.
    pub fn from_json(text: &str) -> Result<Self, ConfigParseError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One check of the repair pass that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairFinding {
    /// Token was missing or empty; it has been reset to the placeholder.
    BotTokenMissing,
    /// Token is still the placeholder.  Nothing to repair.
    BotTokenPlaceholder,
    /// Admin log channel is `0` (or absent).
    AdminLogChannelUnset,
    /// Server status channel is `0` (or absent).
    ServerStatusChannelUnset,
    /// Admin log channel is not a valid ID; it now reads as unset.
    AdminLogChannelInvalid { found: Number },
    /// Server status channel is not a valid ID; it now reads as unset.
    ServerStatusChannelInvalid { found: Number },
    /// Port was absent, `0`, or outside `1..=65535`; now `8080`.
    HttpPortInvalid { found: Option<i64> },
    /// The file has no `logToFileEnabled` key, so file logging reads as off
    /// even though fresh configs default it to on.
    LogToFileEnabledMissing,
    /// Log file path was missing or empty; now the default path.
    LogFilePathMissing,
}

impl RepairFinding {
    /// Whether the repair action changed the value that will be written back.
    pub fn alters_value(&self) -> bool {
        match self {
            Self::BotTokenMissing | Self::HttpPortInvalid { .. } | Self::LogFilePathMissing => true,
            // A negative ID reads as unset, like `0`.  Anything that is not
            // even an `i64` is overwritten.
            Self::AdminLogChannelInvalid { found } | Self::ServerStatusChannelInvalid { found } => {
                found.as_i64().is_none()
            }
            _ => false,
        }
    }
}

impl fmt::Display for RepairFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BotTokenMissing => write!(
                f,
                "Discord bot token is missing; restored the placeholder. Set discordBotToken in the config file"
            ),
            Self::BotTokenPlaceholder => write!(
                f,
                "Discord bot token is not set. Set discordBotToken in the config file"
            ),
            Self::AdminLogChannelUnset => write!(
                f,
                "Discord admin log channel ID is not set. Set adminLogChannelId in the config file"
            ),
            Self::ServerStatusChannelUnset => write!(
                f,
                "Discord server status channel ID is not set. Set serverStatusChannelId in the config file"
            ),
            Self::AdminLogChannelInvalid { found } => write!(
                f,
                "Discord admin log channel ID {found} is invalid; treating it as not set. Fix adminLogChannelId in the config file"
            ),
            Self::ServerStatusChannelInvalid { found } => write!(
                f,
                "Discord server status channel ID {found} is invalid; treating it as not set. Fix serverStatusChannelId in the config file"
            ),
            Self::HttpPortInvalid { found: Some(port) } => write!(
                f,
                "Discord bot HTTP port {port} is invalid. Using default {DEFAULT_HTTP_PORT}"
            ),
            Self::HttpPortInvalid { found: None } => write!(
                f,
                "Discord bot HTTP port is not set. Using default {DEFAULT_HTTP_PORT}"
            ),
            Self::LogToFileEnabledMissing => write!(
                f,
                "logToFileEnabled is not set; file logging is disabled for this run"
            ),
            Self::LogFilePathMissing => write!(
                f,
                "Log file path is not set. Using default '{DEFAULT_LOG_FILE_PATH}'"
            ),
        }
    }
}

/// Output of the repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub record: ConfigRecord,
    /// Every check that fired, in table order.
    pub findings: Vec<RepairFinding>,
}

impl Repaired {
    /// `true` when at least one field was altered and the file is stale.
    pub fn changed(&self) -> bool {
        self.findings.iter().any(RepairFinding::alters_value)
    }
}

/// Runs every field check against `stored` and builds the effective record.
pub fn repair(stored: StoredConfig) -> Repaired {
    let mut findings = Vec::new();

    let discord_bot_token = match stored.discord_bot_token {
        Some(token) if token == PLACEHOLDER_BOT_TOKEN => {
            findings.push(RepairFinding::BotTokenPlaceholder);
            token
        }
        Some(token) if !token.is_empty() => token,
        _ => {
            findings.push(RepairFinding::BotTokenMissing);
            PLACEHOLDER_BOT_TOKEN.to_string()
        }
    };

    let admin_log_channel_id = repair_channel_id(
        stored.admin_log_channel_id,
        RepairFinding::AdminLogChannelUnset,
        |found| RepairFinding::AdminLogChannelInvalid { found },
        &mut findings,
    );

    let server_status_channel_id = repair_channel_id(
        stored.server_status_channel_id,
        RepairFinding::ServerStatusChannelUnset,
        |found| RepairFinding::ServerStatusChannelInvalid { found },
        &mut findings,
    );

    let discord_bot_http_port = match stored.discord_bot_http_port.map(u16::try_from) {
        Some(Ok(port)) if port != 0 => port,
        _ => {
            findings.push(RepairFinding::HttpPortInvalid {
                found: stored.discord_bot_http_port,
            });
            DEFAULT_HTTP_PORT
        }
    };

    let log_to_file_enabled = match stored.log_to_file_enabled {
        Some(enabled) => enabled,
        None => {
            findings.push(RepairFinding::LogToFileEnabledMissing);
            false
        }
    };

    let log_file_path = match stored.log_file_path {
        Some(path) if !path.is_empty() => path,
        _ => {
            findings.push(RepairFinding::LogFilePathMissing);
            DEFAULT_LOG_FILE_PATH.to_string()
        }
    };

    Repaired {
        record: ConfigRecord {
            discord_bot_token,
            admin_log_channel_id,
            server_status_channel_id,
            discord_bot_http_port,
            log_to_file_enabled,
            log_file_path,
        },
        findings,
    }
}

/// Reads a channel ID, mapping anything that is not a positive `u64` to
/// [`UNSET_CHANNEL_ID`].
fn repair_channel_id(
    stored: Option<Number>,
    unset: RepairFinding,
    invalid: impl FnOnce(Number) -> RepairFinding,
    findings: &mut Vec<RepairFinding>,
) -> u64 {
    match stored.as_ref().map(Number::as_u64) {
        Some(Some(id)) if id != UNSET_CHANNEL_ID => id,
        Some(Some(_)) | None => {
            findings.push(unset);
            UNSET_CHANNEL_ID
        }
        Some(None) => {
            if let Some(found) = stored {
                findings.push(invalid(found));
            }
            UNSET_CHANNEL_ID
        }
    }
}

/// Parses `text` and runs the repair pass over it.
///
/// # Errors
///
/// Returns [`ConfigParseError`] when the text cannot be read as a config
/// object.  Missing or invalid field values are repaired, not reported.
pub fn parse_and_repair(text: &str) -> Result<Repaired, ConfigParseError> {
    StoredConfig::from_json(text).map(repair)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fully_configured() -> StoredConfig {
        StoredConfig {
            discord_bot_token: Some("real-token".to_string()),
            admin_log_channel_id: Some(123456789u64.into()),
            server_status_channel_id: Some(987654321u64.into()),
            discord_bot_http_port: Some(9090),
            log_to_file_enabled: Some(false),
            log_file_path: Some("var/staff.log".to_string()),
        }
    }

    // ── Clean input ──────────────────────────────────────────────────────────

    #[test]
    fn test_fully_configured_input_needs_no_repair() {
        // Arrange
        let stored = fully_configured();

        // Act
        let repaired = repair(stored);

        // Assert
        assert!(repaired.findings.is_empty());
        assert!(!repaired.changed());
        assert_eq!(repaired.record.discord_bot_token(), "real-token");
        assert_eq!(repaired.record.admin_log_channel_id(), 123456789);
        assert_eq!(repaired.record.server_status_channel_id(), 987654321);
        assert_eq!(repaired.record.discord_bot_http_port(), 9090);
        assert!(!repaired.record.is_log_to_file_enabled());
        assert_eq!(repaired.record.log_file_path(), "var/staff.log");
    }

    #[test]
    fn test_serialized_default_record_repairs_to_itself() {
        // Arrange
        let json = ConfigRecord::default().to_pretty_json().expect("serialize");

        // Act
        let repaired = parse_and_repair(&json).expect("parse");

        // Assert – placeholder and unset channels warn but alter nothing
        assert_eq!(repaired.record, ConfigRecord::default());
        assert!(!repaired.changed());
        assert_eq!(
            repaired.findings,
            vec![
                RepairFinding::BotTokenPlaceholder,
                RepairFinding::AdminLogChannelUnset,
                RepairFinding::ServerStatusChannelUnset,
            ]
        );
    }

    // ── Token ────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_token_is_reset_to_placeholder() {
        let stored = StoredConfig {
            discord_bot_token: Some(String::new()),
            ..fully_configured()
        };

        let repaired = repair(stored);

        assert_eq!(repaired.record.discord_bot_token(), PLACEHOLDER_BOT_TOKEN);
        assert_eq!(repaired.findings, vec![RepairFinding::BotTokenMissing]);
        assert!(repaired.changed());
    }

    #[test]
    fn test_missing_token_is_reset_to_placeholder() {
        let stored = StoredConfig {
            discord_bot_token: None,
            ..fully_configured()
        };

        let repaired = repair(stored);

        assert_eq!(repaired.record.discord_bot_token(), PLACEHOLDER_BOT_TOKEN);
        assert!(repaired.changed());
    }

    #[test]
    fn test_placeholder_token_warns_without_change() {
        let stored = StoredConfig {
            discord_bot_token: Some(PLACEHOLDER_BOT_TOKEN.to_string()),
            ..fully_configured()
        };

        let repaired = repair(stored);

        assert_eq!(repaired.findings, vec![RepairFinding::BotTokenPlaceholder]);
        assert!(!repaired.changed());
    }

    // ── Channels ─────────────────────────────────────────────────────────────

    #[test]
    fn test_zero_channel_ids_warn_without_change() {
        // Arrange
        let stored = StoredConfig {
            admin_log_channel_id: Some(0u64.into()),
            server_status_channel_id: None,
            ..fully_configured()
        };

        // Act
        let repaired = repair(stored);

        // Assert
        assert_eq!(
            repaired.findings,
            vec![
                RepairFinding::AdminLogChannelUnset,
                RepairFinding::ServerStatusChannelUnset,
            ]
        );
        assert!(!repaired.changed());
        assert_eq!(repaired.record.admin_log_channel_id(), 0);
        assert_eq!(repaired.record.server_status_channel_id(), 0);
    }

    #[test]
    fn test_negative_channel_id_reads_as_unset_without_change() {
        // Arrange
        let stored = StoredConfig {
            admin_log_channel_id: Some((-1i64).into()),
            ..fully_configured()
        };

        // Act
        let repaired = repair(stored);

        // Assert
        assert_eq!(
            repaired.findings,
            vec![RepairFinding::AdminLogChannelInvalid {
                found: (-1i64).into()
            }]
        );
        assert!(!repaired.changed());
        assert_eq!(repaired.record.admin_log_channel_id(), 0);
        assert_eq!(repaired.record.admin_log_channel(), None);
        assert_eq!(repaired.record.discord_bot_token(), "real-token");
        assert_eq!(repaired.record.discord_bot_http_port(), 9090);
    }

    #[test]
    fn test_channel_id_beyond_u64_is_reset_to_unset() {
        // Arrange: one more than u64::MAX, every other field valid
        let json = r#"{
            "discordBotToken": "real-token",
            "adminLogChannelId": 1,
            "serverStatusChannelId": 18446744073709551616,
            "discordBotHttpPort": 9090,
            "logToFileEnabled": true,
            "logFilePath": "a.log"
        }"#;

        // Act
        let repaired = parse_and_repair(json).expect("parse");

        // Assert
        assert_eq!(repaired.findings.len(), 1);
        assert!(matches!(
            repaired.findings[0],
            RepairFinding::ServerStatusChannelInvalid { .. }
        ));
        assert!(repaired.changed());
        assert_eq!(repaired.record.server_status_channel_id(), 0);
        assert_eq!(repaired.record.discord_bot_token(), "real-token");
    }

    #[test]
    fn test_fractional_channel_id_is_reset_to_unset() {
        let repaired = parse_and_repair(r#"{ "adminLogChannelId": 12.5 }"#).expect("parse");

        assert_eq!(repaired.record.admin_log_channel_id(), 0);
        assert!(repaired
            .findings
            .iter()
            .any(|f| matches!(f, RepairFinding::AdminLogChannelInvalid { .. }) && f.alters_value()));
    }

    #[test]
    fn test_largest_channel_id_is_kept() {
        let repaired =
            parse_and_repair(&format!(r#"{{ "adminLogChannelId": {} }}"#, u64::MAX)).expect("parse");
        assert_eq!(repaired.record.admin_log_channel_id(), u64::MAX);
    }

    // ── Port ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_zero_port_is_set_to_default() {
        let stored = StoredConfig {
            discord_bot_http_port: Some(0),
            ..fully_configured()
        };

        let repaired = repair(stored);

        assert_eq!(repaired.record.discord_bot_http_port(), 8080);
        assert_eq!(
            repaired.findings,
            vec![RepairFinding::HttpPortInvalid { found: Some(0) }]
        );
        assert!(repaired.changed());
    }

    #[test]
    fn test_missing_port_is_set_to_default() {
        let stored = StoredConfig {
            discord_bot_http_port: None,
            ..fully_configured()
        };

        let repaired = repair(stored);

        assert_eq!(repaired.record.discord_bot_http_port(), 8080);
        assert!(repaired.changed());
    }

    #[test]
    fn test_out_of_range_ports_are_set_to_default() {
        for bad in [-1, 65536, 1_000_000] {
            let stored = StoredConfig {
                discord_bot_http_port: Some(bad),
                ..fully_configured()
            };

            let repaired = repair(stored);

            assert_eq!(repaired.record.discord_bot_http_port(), 8080, "port {bad}");
            assert_eq!(
                repaired.findings,
                vec![RepairFinding::HttpPortInvalid { found: Some(bad) }]
            );
        }
    }

    #[test]
    fn test_highest_valid_port_is_kept() {
        let stored = StoredConfig {
            discord_bot_http_port: Some(65535),
            ..fully_configured()
        };
        assert_eq!(repair(stored).record.discord_bot_http_port(), 65535);
    }

    // ── File logging ─────────────────────────────────────────────────────────

    #[test]
    fn test_missing_log_to_file_flag_reads_as_disabled() {
        // The fresh-record default is `true`; an absent key reads as `false`.
        let stored = StoredConfig {
            log_to_file_enabled: None,
            ..fully_configured()
        };

        let repaired = repair(stored);

        assert!(!repaired.record.is_log_to_file_enabled());
        assert_eq!(repaired.findings, vec![RepairFinding::LogToFileEnabledMissing]);
        assert!(!repaired.changed());
    }

    #[test]
    fn test_empty_log_path_is_set_to_default() {
        let stored = StoredConfig {
            log_file_path: Some(String::new()),
            ..fully_configured()
        };

        let repaired = repair(stored);

        assert_eq!(repaired.record.log_file_path(), DEFAULT_LOG_FILE_PATH);
        assert_eq!(repaired.findings, vec![RepairFinding::LogFilePathMissing]);
        assert!(repaired.changed());
    }

    // ── Parsing ──────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_object_repairs_every_field() {
        // Act
        let repaired = parse_and_repair("{}").expect("parse");

        // Assert
        assert!(repaired.changed());
        assert_eq!(repaired.record.discord_bot_token(), PLACEHOLDER_BOT_TOKEN);
        assert_eq!(repaired.record.discord_bot_http_port(), 8080);
        assert_eq!(repaired.record.log_file_path(), DEFAULT_LOG_FILE_PATH);
        assert!(!repaired.record.is_log_to_file_enabled());
        assert_eq!(repaired.findings.len(), 6);
    }

    #[test]
    fn test_null_values_are_treated_as_missing() {
        let json = r#"{ "discordBotToken": null, "logFilePath": null, "discordBotHttpPort": null }"#;

        let repaired = parse_and_repair(json).expect("parse");

        assert_eq!(repaired.record.discord_bot_token(), PLACEHOLDER_BOT_TOKEN);
        assert_eq!(repaired.record.log_file_path(), DEFAULT_LOG_FILE_PATH);
        assert_eq!(repaired.record.discord_bot_http_port(), 8080);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{
            "discordBotToken": "real-token",
            "adminLogChannelId": 1,
            "serverStatusChannelId": 2,
            "discordBotHttpPort": 8081,
            "logToFileEnabled": true,
            "logFilePath": "a.log",
            "legacyOption": { "nested": [1, 2, 3] }
        }"#;

        let repaired = parse_and_repair(json).expect("parse");

        assert!(repaired.findings.is_empty());
        let rewritten = repaired.record.to_pretty_json().expect("serialize");
        assert!(!rewritten.contains("legacyOption"));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(parse_and_repair("{ this is not json").is_err());
        assert!(parse_and_repair("").is_err());
        assert!(parse_and_repair("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_wrongly_typed_field_is_a_parse_error() {
        assert!(parse_and_repair(r#"{ "adminLogChannelId": "not-a-number" }"#).is_err());
        assert!(parse_and_repair(r#"{ "discordBotHttpPort": "8080" }"#).is_err());
        assert!(parse_and_repair(r#"{ "logToFileEnabled": "yes" }"#).is_err());
    }

    #[test]
    fn test_parse_error_message_names_json() {
        let err = parse_and_repair("nope").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse config JSON"));
    }

    #[test]
    fn test_finding_messages_name_the_config_key() {
        assert!(RepairFinding::BotTokenPlaceholder
            .to_string()
            .contains("discordBotToken"));
        assert!(RepairFinding::AdminLogChannelUnset
            .to_string()
            .contains("adminLogChannelId"));
        assert!(RepairFinding::HttpPortInvalid { found: Some(0) }
            .to_string()
            .contains("8080"));
    }
}
