// crates/trench-server/src/config/file.rs
// File-based configuration from ~/.trench/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure. Every key is optional; environment
/// variables override whatever is set here.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TrenchConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub wait: WaitSection,
}

/// Upstream simulator API
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

/// Default satellite / ground station used when a tool call omits them
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DefaultsSection {
    pub satellite_id: Option<String>,
    pub ground_station_id: Option<String>,
}

/// Poll cadence, retry budget and the dispatcher's wait ceiling
#[derive(Debug, Deserialize, Default, Clone)]
pub struct WaitSection {
    pub poll_interval_ms: Option<u64>,
    pub retry_budget: Option<u32>,
    pub backoff_base_ms: Option<u64>,
    pub backoff_max_ms: Option<u64>,
    pub ceiling_secs: Option<u64>,
}

impl TrenchConfig {
    /// Load config from ~/.trench/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }
}

/// ~/.trench
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trench")
}
