//! Staff Mode Server entry point.
//!
//! Loads the staff mode configuration once, sets up logging from it, and
//! reports the effective settings.  The Discord client and the HTTP listener
//! are started by the host application from the same [`ConfigStore`].
//!
//! # Usage
//!
//! ```text
//! staff-mode-server [OPTIONS]
//!
//! Options:
//!   --config-dir <DIR>  Directory holding staff-mode.json [default: config]
//!   --print             Print the effective config (token redacted) to stdout
//! ```
//!
//! # Startup sequence
//!
//! ```text
//! main()
//!  └─ Cli::parse()
//!  └─ ConfigStore::new(JsonFileStorage)
//!  └─ store.get()            -- under a stderr-only bootstrap subscriber
//!  └─ init_logging(record)   -- stderr + optional log file
//!  └─ report provenance and settings
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use staff_mode_core::domain::ConfigRecord;
use staff_mode_server::application::{ConfigStore, LoadProvenance, LoadedConfig};
use staff_mode_server::infrastructure::logging::{bootstrap_subscriber, init_logging};
use staff_mode_server::infrastructure::storage::json_file::{JsonFileStorage, DEFAULT_CONFIG_DIR};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Staff mode server configuration loader.
#[derive(Debug, Parser)]
#[command(
    name = "staff-mode-server",
    about = "Loads and repairs the staff mode server configuration",
    version
)]
struct Cli {
    /// Directory containing `staff-mode.json`.  Created on first run.
    #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Print the effective configuration as JSON, with the bot token redacted.
    #[arg(long)]
    print: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store = ConfigStore::new(JsonFileStorage::in_dir(&cli.config_dir));

    // Repair warnings are emitted during the load, before the configured
    // subscriber can exist.
    let loaded = tracing::subscriber::with_default(bootstrap_subscriber(), || store.get());

    init_logging(&loaded.record).context("failed to initialise logging")?;

    report(store.storage(), loaded);

    if cli.print {
        println!("{}", redacted_json(&loaded.record)?);
    }

    Ok(())
}

/// Logs how the config was obtained and the non-secret settings.
fn report(storage: &JsonFileStorage, loaded: &LoadedConfig) {
    let path = storage.path().display();
    match loaded.provenance {
        LoadProvenance::CreatedDefault => info!("created default config at {path}"),
        LoadProvenance::LoadedClean => info!("config at {path} is valid"),
        LoadProvenance::LoadedAndRepaired => {
            info!(
                "config at {path} was repaired ({} issue(s))",
                loaded.findings.len()
            )
        }
        LoadProvenance::FellBackToDefault => {
            warn!("config at {path} was unusable; running with defaults")
        }
    }
    if !loaded.persisted {
        warn!("config changes could not be written to {path}; they apply to this run only");
    }

    let record = &loaded.record;
    info!(
        "staff mode settings: http_port={}, admin_log_channel={}, server_status_channel={}, bot_token_set={}, log_to_file={}",
        record.discord_bot_http_port(),
        record.admin_log_channel_id(),
        record.server_status_channel_id(),
        record.has_bot_token(),
        record.is_log_to_file_enabled(),
    );
}

/// Pretty JSON of `record` with a configured token replaced by `***`.
fn redacted_json(record: &ConfigRecord) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(record).context("failed to serialize config")?;
    if record.has_bot_token() {
        value["discordBotToken"] = serde_json::Value::from("***");
    }
    serde_json::to_string_pretty(&value).context("failed to serialize config")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
