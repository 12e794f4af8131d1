//! crates/trench-server/src/tools/mod.rs
//! Unified tool core for the Trench MCP server

pub mod core;

// Re-export public API for CLI dispatcher, tests, and external callers
pub use core::{
    // Trait
    ToolContext,
    // Tool handlers (used by MCP router, CLI tool dispatcher and integration tests)
    get_downlink_status,
    get_health,
    get_next_pass,
    get_simulation_state,
    list_passes,
    point_antenna,
    start_downlink,
    start_tracking,
    stop_downlink,
    stop_tracking,
    wait_for_next_pass,
    wait_until_time,
};
