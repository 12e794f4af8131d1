// crates/trench-server/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use super::file::TrenchConfig;
use crate::error::{Result, TrenchError};
use crate::wait::WaitPolicy;
use std::time::Duration;
use tracing::{Level, debug, info, warn};
use trench_types::ContactTarget;

/// Default simulator API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default dispatcher ceiling for a single wait (one hour)
pub const DEFAULT_WAIT_CEILING_SECS: u64 = 3600;

/// Parse a TRENCH_LOG value into a level.
pub fn parse_log_level(raw: &str) -> Option<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Upstream simulator API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL (TRENCH_API_URL)
    pub base_url: String,
    /// Bearer token (TRENCH_API_TOKEN)
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

/// Default satellite / ground station ids supplied to tools that omit them
#[derive(Debug, Clone, Default)]
pub struct DefaultTargets {
    /// TRENCH_DEFAULT_SATELLITE
    pub satellite_id: Option<String>,
    /// TRENCH_DEFAULT_GROUND_STATION
    pub ground_station_id: Option<String>,
}

impl DefaultTargets {
    /// Resolve a satellite id, preferring the explicit argument
    pub fn satellite(&self, explicit: Option<String>) -> Result<String> {
        pick(explicit, self.satellite_id.as_ref(), "satellite_id", "TRENCH_DEFAULT_SATELLITE")
    }

    /// Resolve a ground station id, preferring the explicit argument
    pub fn ground_station(&self, explicit: Option<String>) -> Result<String> {
        pick(
            explicit,
            self.ground_station_id.as_ref(),
            "ground_station_id",
            "TRENCH_DEFAULT_GROUND_STATION",
        )
    }

    /// Resolve both ids into a contact target
    pub fn contact_target(
        &self,
        satellite_id: Option<String>,
        ground_station_id: Option<String>,
    ) -> Result<ContactTarget> {
        Ok(ContactTarget {
            satellite_id: self.satellite(satellite_id)?,
            ground_station_id: self.ground_station(ground_station_id)?,
        })
    }
}

fn pick(explicit: Option<String>, fallback: Option<&String>, field: &str, env: &str) -> Result<String> {
    explicit
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.cloned())
        .ok_or_else(|| {
            TrenchError::InvalidInput(format!(
                "{} is required (no default configured; set {})",
                field, env
            ))
        })
}

/// Wait tuning as configured (raw values, validated by `EnvConfig::validate`)
#[derive(Debug, Clone)]
pub struct WaitSettings {
    /// TRENCH_POLL_INTERVAL_MS
    pub poll_interval_ms: u64,
    /// TRENCH_POLL_RETRY_BUDGET
    pub retry_budget: u32,
    /// TRENCH_BACKOFF_BASE_MS
    pub backoff_base_ms: u64,
    /// TRENCH_BACKOFF_MAX_MS
    pub backoff_max_ms: u64,
    /// TRENCH_WAIT_CEILING_SECS (0 disables the ceiling)
    pub ceiling_secs: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        let policy = WaitPolicy::default();
        Self {
            poll_interval_ms: policy.poll_interval.as_millis() as u64,
            retry_budget: policy.retry_budget,
            backoff_base_ms: policy.backoff_base.as_millis() as u64,
            backoff_max_ms: policy.backoff_max.as_millis() as u64,
            ceiling_secs: DEFAULT_WAIT_CEILING_SECS,
        }
    }
}

impl WaitSettings {
    pub fn policy(&self) -> WaitPolicy {
        WaitPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            retry_budget: self.retry_budget,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            backoff_max: Duration::from_millis(self.backoff_max_ms),
        }
    }

    /// Ceiling the dispatcher imposes on each wait call
    pub fn ceiling(&self) -> Option<Duration> {
        (self.ceiling_secs > 0).then(|| Duration::from_secs(self.ceiling_secs))
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all settings in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api: ApiConfig,
    pub defaults: DefaultTargets,
    pub wait: WaitSettings,
    /// Log level override (TRENCH_LOG); unknown values are dropped
    pub log_level: Option<Level>,
}

impl EnvConfig {
    /// TRENCH_LOG from the process environment. Read before the subscriber
    /// exists, so this cannot go through `load()`.
    pub fn log_level_from_env() -> Option<Level> {
        std::env::var("TRENCH_LOG")
            .ok()
            .and_then(|raw| parse_log_level(&raw))
    }

    /// Load the config file, then overlay the process environment (call once at startup)
    pub fn load() -> Self {
        info!("Loading configuration");
        Self::from_sources(&TrenchConfig::load(), |name| std::env::var(name).ok())
    }

    /// Merge a parsed config file with an environment lookup.
    /// Environment wins; empty values are ignored.
    pub fn from_sources<F>(file: &TrenchConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let num = |name: &str| -> Option<u64> {
            let raw = var(name)?;
            match raw.parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(var = name, value = %raw, "Ignoring non-numeric value");
                    None
                }
            }
        };

        let base = WaitSettings::default();
        let wait = WaitSettings {
            poll_interval_ms: num("TRENCH_POLL_INTERVAL_MS")
                .or(file.wait.poll_interval_ms)
                .unwrap_or(base.poll_interval_ms),
            retry_budget: num("TRENCH_POLL_RETRY_BUDGET")
                .map(|n| n.min(u32::MAX as u64) as u32)
                .or(file.wait.retry_budget)
                .unwrap_or(base.retry_budget),
            backoff_base_ms: num("TRENCH_BACKOFF_BASE_MS")
                .or(file.wait.backoff_base_ms)
                .unwrap_or(base.backoff_base_ms),
            backoff_max_ms: num("TRENCH_BACKOFF_MAX_MS")
                .or(file.wait.backoff_max_ms)
                .unwrap_or(base.backoff_max_ms),
            ceiling_secs: num("TRENCH_WAIT_CEILING_SECS")
                .or(file.wait.ceiling_secs)
                .unwrap_or(base.ceiling_secs),
        };

        let config = Self {
            api: ApiConfig {
                base_url: var("TRENCH_API_URL")
                    .or_else(|| file.api.base_url.clone())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                token: var("TRENCH_API_TOKEN").or_else(|| file.api.token.clone()),
            },
            defaults: DefaultTargets {
                satellite_id: var("TRENCH_DEFAULT_SATELLITE")
                    .or_else(|| file.defaults.satellite_id.clone()),
                ground_station_id: var("TRENCH_DEFAULT_GROUND_STATION")
                    .or_else(|| file.defaults.ground_station_id.clone()),
            },
            wait,
            log_level: var("TRENCH_LOG").and_then(|raw| {
                let level = parse_log_level(&raw);
                if level.is_none() {
                    warn!(var = "TRENCH_LOG", value = %raw, "Ignoring unknown log level");
                }
                level
            }),
        };

        debug!(
            base_url = %config.api.base_url,
            has_token = config.api.token.is_some(),
            poll_interval_ms = config.wait.poll_interval_ms,
            "Configuration resolved"
        );
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        match url::Url::parse(&self.api.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => validation.add_error(format!(
                "TRENCH_API_URL must be http or https, got '{}'",
                url.scheme()
            )),
            Err(e) => validation.add_error(format!(
                "TRENCH_API_URL '{}' is not a valid URL: {}",
                self.api.base_url, e
            )),
        }

        if self.api.token.is_none() {
            validation.add_warning("No API token configured. Set TRENCH_API_TOKEN.");
        }

        if self.defaults.satellite_id.is_none() {
            validation.add_warning(
                "No default satellite. Pass satellite_id on each call or set TRENCH_DEFAULT_SATELLITE.",
            );
        }
        if self.defaults.ground_station_id.is_none() {
            validation.add_warning(
                "No default ground station. Pass ground_station_id on each call or set TRENCH_DEFAULT_GROUND_STATION.",
            );
        }

        if self.wait.poll_interval_ms == 0 {
            validation.add_error("TRENCH_POLL_INTERVAL_MS must be greater than 0");
        }
        if self.wait.backoff_base_ms == 0 {
            validation.add_error("TRENCH_BACKOFF_BASE_MS must be greater than 0");
        }
        if self.wait.backoff_max_ms < self.wait.backoff_base_ms {
            validation.add_error(format!(
                "TRENCH_BACKOFF_MAX_MS ({}) is below TRENCH_BACKOFF_BASE_MS ({})",
                self.wait.backoff_max_ms, self.wait.backoff_base_ms
            ));
        }
        if self.wait.ceiling_secs == 0 {
            validation.add_warning("Wait ceiling disabled; waits end only on cancellation.");
        }

        validation
    }
}
