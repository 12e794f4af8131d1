// crates/trench-server/src/mcp/mod.rs
// MCP Server implementation

pub mod handler;
pub mod http;
pub mod requests;

use crate::config::{DefaultTargets, WaitSettings};
use crate::sim::SimulatorApi;
use crate::tools::{self, ToolContext};
use crate::wait::WaitPolicy;
use requests::{
    DownlinkStatusRequest, HealthRequest, ListPassesRequest, NextPassRequest, PointAntennaRequest,
    StartDownlinkRequest, StartTrackingRequest, StopDownlinkRequest, StopTrackingRequest,
    WaitForNextPassRequest, WaitUntilTimeRequest,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use std::sync::Arc;
use std::time::Duration;

/// MCP Server state
#[derive(Clone)]
pub struct TrenchServer {
    simulator: Arc<dyn SimulatorApi>,
    defaults: DefaultTargets,
    wait_policy: WaitPolicy,
    wait_ceiling: Option<Duration>,
    tool_router: ToolRouter<Self>,
}

impl TrenchServer {
    pub fn new(
        simulator: Arc<dyn SimulatorApi>,
        defaults: DefaultTargets,
        wait: &WaitSettings,
    ) -> Self {
        Self {
            simulator,
            defaults,
            wait_policy: wait.policy(),
            wait_ceiling: wait.ceiling(),
            tool_router: Self::tool_router(),
        }
    }

    /// Names of every tool registered with the router
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }
}

impl ToolContext for TrenchServer {
    fn simulator(&self) -> &Arc<dyn SimulatorApi> {
        &self.simulator
    }

    fn defaults(&self) -> &DefaultTargets {
        &self.defaults
    }

    fn wait_policy(&self) -> WaitPolicy {
        self.wait_policy
    }

    fn wait_ceiling(&self) -> Option<Duration> {
        self.wait_ceiling
    }
}

#[tool_router]
impl TrenchServer {
    #[tool(description = "Get the current simulation state: simulated time, running flag and passes in progress.")]
    async fn get_simulation_state(&self) -> Result<String, String> {
        tools::get_simulation_state(self).await
    }

    #[tool(description = "List upcoming passes, optionally filtered by satellite and ground station.")]
    async fn list_passes(
        &self,
        Parameters(req): Parameters<ListPassesRequest>,
    ) -> Result<String, String> {
        tools::list_passes(self, req.satellite_id, req.ground_station_id, req.hours).await
    }

    #[tool(description = "Get the next scheduled pass for a satellite over a ground station.")]
    async fn get_next_pass(
        &self,
        Parameters(req): Parameters<NextPassRequest>,
    ) -> Result<String, String> {
        tools::get_next_pass(self, req.satellite_id, req.ground_station_id).await
    }

    #[tool(description = "Start a downlink session, optionally bound to a pass.")]
    async fn start_downlink(
        &self,
        Parameters(req): Parameters<StartDownlinkRequest>,
    ) -> Result<String, String> {
        tools::start_downlink(self, req.satellite_id, req.ground_station_id, req.pass_id).await
    }

    #[tool(description = "Stop a downlink session.")]
    async fn stop_downlink(
        &self,
        Parameters(req): Parameters<StopDownlinkRequest>,
    ) -> Result<String, String> {
        tools::stop_downlink(self, req.session_id).await
    }

    #[tool(description = "Get the status of one downlink session, or all sessions.")]
    async fn get_downlink_status(
        &self,
        Parameters(req): Parameters<DownlinkStatusRequest>,
    ) -> Result<String, String> {
        tools::get_downlink_status(self, req.session_id).await
    }

    #[tool(description = "Point a ground station antenna at a fixed azimuth/elevation (degrees).")]
    async fn point_antenna(
        &self,
        Parameters(req): Parameters<PointAntennaRequest>,
    ) -> Result<String, String> {
        tools::point_antenna(self, req.ground_station_id, req.azimuth, req.elevation).await
    }

    #[tool(description = "Start tracking a satellite with a ground station antenna.")]
    async fn start_tracking(
        &self,
        Parameters(req): Parameters<StartTrackingRequest>,
    ) -> Result<String, String> {
        tools::start_tracking(self, req.ground_station_id, req.satellite_id).await
    }

    #[tool(description = "Stop antenna tracking at a ground station.")]
    async fn stop_tracking(
        &self,
        Parameters(req): Parameters<StopTrackingRequest>,
    ) -> Result<String, String> {
        tools::stop_tracking(self, req.ground_station_id).await
    }

    #[tool(description = "Get simulator health, overall or for one component.")]
    async fn get_health(
        &self,
        Parameters(req): Parameters<HealthRequest>,
    ) -> Result<String, String> {
        tools::get_health(self, req.component).await
    }

    #[tool(description = "Block until simulated time reaches target_sim_time (seconds). Returns immediately if already reached. Survives simulation restarts; cancel the request to stop waiting.")]
    async fn wait_until_time(
        &self,
        Parameters(req): Parameters<WaitUntilTimeRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<String, String> {
        tools::wait_until_time(self, req.target_sim_time, &context.ct).await
    }

    #[tool(description = "Block until the next pass for a satellite over a ground station begins. Returns immediately if a pass is already in progress; fails if none is scheduled.")]
    async fn wait_for_next_pass(
        &self,
        Parameters(req): Parameters<WaitForNextPassRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<String, String> {
        tools::wait_for_next_pass(self, req.satellite_id, req.ground_station_id, &context.ct).await
    }
}
