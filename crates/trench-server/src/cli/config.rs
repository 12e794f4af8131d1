// crates/trench-server/src/cli/config.rs
// Effective configuration and validation report

use anyhow::{Result, bail};
use trench::config::{EnvConfig, TrenchConfig};

fn or_unset(value: Option<&String>) -> &str {
    value.map(String::as_str).unwrap_or("(not set)")
}

/// Render the effective configuration (token redacted).
pub fn render_config(config: &EnvConfig) -> String {
    let wait = &config.wait;
    let ceiling = match wait.ceiling() {
        Some(c) => format!("{}s", c.as_secs()),
        None => "disabled".to_string(),
    };

    [
        format!("Config file:        {}", TrenchConfig::config_path().display()),
        String::new(),
        format!("API URL:            {}", config.api.base_url),
        format!(
            "API token:          {}",
            if config.api.token.is_some() { "set" } else { "(not set)" }
        ),
        format!("Default satellite:  {}", or_unset(config.defaults.satellite_id.as_ref())),
        format!("Default station:    {}", or_unset(config.defaults.ground_station_id.as_ref())),
        String::new(),
        format!("Poll interval:      {}ms", wait.poll_interval_ms),
        format!("Retry budget:       {} consecutive failures", wait.retry_budget),
        format!("Backoff:            {}ms doubling to {}ms", wait.backoff_base_ms, wait.backoff_max_ms),
        format!("Wait ceiling:       {}", ceiling),
        String::new(),
        format!(
            "Log level:          {}",
            config.log_level.map_or_else(|| "(default)".to_string(), |l| l.to_string())
        ),
    ]
    .join("\n")
}

/// Print the effective configuration and its validation report.
/// Fails when the configuration has errors.
pub fn run_config_check() -> Result<()> {
    let config = EnvConfig::load();
    let validation = config.validate();

    println!("{}", render_config(&config));
    println!();
    println!("{}", validation.report());

    if !validation.is_valid() {
        bail!("configuration has {} error(s)", validation.errors.len());
    }
    Ok(())
}
