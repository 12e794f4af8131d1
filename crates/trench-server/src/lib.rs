// crates/trench-server/src/lib.rs
// Trench - MCP tool server for a satellite ground-station simulator

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod sim;
pub mod tools;
pub mod wait;
pub use error::{Result, TrenchError};
