//! Core tool implementations for MCP.
//!
//! All tools are implemented as async functions that accept `&impl ToolContext`
//! and return `Result<String, String>` for consistent error handling. The MCP
//! router and the CLI dispatcher both call straight into these.

use crate::config::DefaultTargets;
use crate::error::TrenchError;
use crate::sim::SimulatorApi;
use crate::wait::{WaitController, WaitPolicy};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Common context required by all tools.
/// Implemented by TrenchServer (MCP) and the test contexts.
pub trait ToolContext: Send + Sync {
    /// Simulator API shared by every tool call
    fn simulator(&self) -> &Arc<dyn SimulatorApi>;

    /// Satellite / ground station ids used when a tool omits them
    fn defaults(&self) -> &DefaultTargets;

    /// Poll cadence and retry tuning for wait tools
    fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::default()
    }

    /// Longest a single wait may run before the dispatcher cancels it
    fn wait_ceiling(&self) -> Option<Duration> {
        None
    }

    /// Fresh controller for one wait call
    fn wait_controller(&self) -> WaitController {
        WaitController::new(self.simulator().clone(), self.wait_policy())
    }
}

/// Pretty-print a tool response.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

/// Percent-encode a caller-supplied id for use as a path segment.
pub(crate) fn path_segment(field: &str, id: &str) -> Result<String, String> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(TrenchError::InvalidInput(format!("{} must not be empty", field)).into());
    }
    Ok(urlencoding::encode(trimmed).into_owned())
}

// Shared test utilities (only compiled during tests)
#[cfg(test)]
pub(crate) mod test_utils;

// Sub-modules with tool implementations
pub mod antenna;
pub mod downlink;
pub mod sim;
pub mod wait;

// Re-export handler functions used by MCP router, CLI, and tests
pub use antenna::{point_antenna, start_tracking, stop_tracking};
pub use downlink::{get_downlink_status, start_downlink, stop_downlink};
pub use sim::{get_health, get_next_pass, get_simulation_state, list_passes};
pub use wait::{wait_for_next_pass, wait_until_time};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment_encodes() {
        assert_eq!(path_segment("session_id", " d 1/x ").unwrap(), "d%201%2Fx");
    }

    #[test]
    fn test_path_segment_rejects_empty() {
        let err = path_segment("session_id", "   ").unwrap_err();
        assert!(err.contains("session_id must not be empty"));
    }

    #[test]
    fn test_to_pretty_json() {
        let out = to_pretty_json(&serde_json::json!({ "a": 1 })).unwrap();
        assert!(out.contains("\"a\": 1"));
    }
}
