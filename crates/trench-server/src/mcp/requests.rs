// crates/trench-server/src/mcp/requests.rs
// MCP tool request types

use rmcp::schemars;
use serde::Deserialize;

// ============================================================================
// Simulation & passes
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListPassesRequest {
    #[schemars(description = "Satellite ID filter (defaults to TRENCH_DEFAULT_SATELLITE if set)")]
    pub satellite_id: Option<String>,
    #[schemars(description = "Ground station ID filter (defaults to TRENCH_DEFAULT_GROUND_STATION if set)")]
    pub ground_station_id: Option<String>,
    #[schemars(description = "Look-ahead window in hours, (0, 168]")]
    pub hours: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NextPassRequest {
    #[schemars(description = "Satellite ID (defaults to TRENCH_DEFAULT_SATELLITE)")]
    pub satellite_id: Option<String>,
    #[schemars(description = "Ground station ID (defaults to TRENCH_DEFAULT_GROUND_STATION)")]
    pub ground_station_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HealthRequest {
    #[schemars(description = "Component name; omit for overall health")]
    pub component: Option<String>,
}

// ============================================================================
// Downlink
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartDownlinkRequest {
    #[schemars(description = "Satellite ID (defaults to TRENCH_DEFAULT_SATELLITE)")]
    pub satellite_id: Option<String>,
    #[schemars(description = "Ground station ID (defaults to TRENCH_DEFAULT_GROUND_STATION)")]
    pub ground_station_id: Option<String>,
    #[schemars(description = "Pass to bind the session to")]
    pub pass_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StopDownlinkRequest {
    #[schemars(description = "Downlink session ID")]
    pub session_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DownlinkStatusRequest {
    #[schemars(description = "Downlink session ID; omit to list all sessions")]
    pub session_id: Option<String>,
}

// ============================================================================
// Antenna
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PointAntennaRequest {
    #[schemars(description = "Ground station ID (defaults to TRENCH_DEFAULT_GROUND_STATION)")]
    pub ground_station_id: Option<String>,
    #[schemars(description = "Azimuth in degrees, [0, 360)")]
    pub azimuth: f64,
    #[schemars(description = "Elevation in degrees, [0, 90]")]
    pub elevation: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartTrackingRequest {
    #[schemars(description = "Ground station ID (defaults to TRENCH_DEFAULT_GROUND_STATION)")]
    pub ground_station_id: Option<String>,
    #[schemars(description = "Satellite to track (defaults to TRENCH_DEFAULT_SATELLITE)")]
    pub satellite_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StopTrackingRequest {
    #[schemars(description = "Ground station ID (defaults to TRENCH_DEFAULT_GROUND_STATION)")]
    pub ground_station_id: Option<String>,
}

// ============================================================================
// Waits
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WaitUntilTimeRequest {
    #[schemars(description = "Absolute simulated time to wait for, in seconds since the simulation epoch")]
    pub target_sim_time: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WaitForNextPassRequest {
    #[schemars(description = "Satellite ID (defaults to TRENCH_DEFAULT_SATELLITE)")]
    pub satellite_id: Option<String>,
    #[schemars(description = "Ground station ID (defaults to TRENCH_DEFAULT_GROUND_STATION)")]
    pub ground_station_id: Option<String>,
}
