// crates/trench-server/src/config/mod.rs
// Configuration: ~/.trench/config.toml overlaid by environment variables

pub mod env;
pub mod file;

pub use env::{ApiConfig, ConfigValidation, DefaultTargets, EnvConfig, WaitSettings, parse_log_level};
pub use file::TrenchConfig;
