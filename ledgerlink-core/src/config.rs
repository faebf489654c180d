//! Configuration management
//!
//! settings.json format:
//! ```json
//! {
//!   "accountMappings": { "feed-acct-1": "Checking" },
//!   "feed": { "provider": "json", "path": "feed.json" },
//!   "ledgerPath": "ledger.json",
//!   "legacyFallback": false
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::AccountMap;
use crate::services::ReconcileOptions;

pub const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    account_mappings: AccountMap,
    #[serde(default)]
    feed: FeedSettings,
    #[serde(default)]
    ledger_path: Option<PathBuf>,
    #[serde(default)]
    legacy_fallback: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Which feed provider to sync from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_provider() -> String {
    "demo".to_string()
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            path: None,
        }
    }
}

/// Ledgerlink configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub account_mappings: AccountMap,
    pub feed: FeedSettings,
    pub ledger_path: Option<PathBuf>,
    pub legacy_fallback: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_mappings: AccountMap::new(),
            feed: FeedSettings::default(),
            ledger_path: None,
            legacy_fallback: false,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// The legacy fallback knob can additionally be forced via the
    /// `LEDGERLINK_LEGACY_FALLBACK` environment variable (for CI/testing).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let legacy_fallback = match std::env::var("LEDGERLINK_LEGACY_FALLBACK").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.legacy_fallback,
        };

        Ok(Self {
            account_mappings: raw.account_mappings.clone(),
            feed: raw.feed.clone(),
            ledger_path: raw.ledger_path.clone(),
            legacy_fallback,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves settings fields this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.account_mappings = self.account_mappings.clone();
        settings.feed = self.feed.clone();
        settings.ledger_path = self.ledger_path.clone();
        settings.legacy_fallback = self.legacy_fallback;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Engine options derived from this config
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            legacy_fallback: self.legacy_fallback,
        }
    }

    /// Ledger file location, defaulting to `ledger.json` in the data dir
    pub fn resolve_ledger_path(&self, data_dir: &Path) -> PathBuf {
        match &self.ledger_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join("ledger.json"),
        }
    }
}
