// crates/trench-server/src/sim/mod.rs
// Simulator API: the collaborator every tool and wait is built on

pub mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use client::SimulatorClient;

use crate::error::{Result, TrenchError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use trench_types::{ContactTarget, PassWindow, SimulationState};

/// Upstream endpoint paths (relative to the configured base URL)
pub mod endpoints {
    pub const SIMULATION_STATE: &str = "/api/v1/simulation/state";
    pub const PASSES: &str = "/api/v1/passes";
    pub const NEXT_PASS: &str = "/api/v1/passes/next";
    pub const DOWNLINK_SESSIONS: &str = "/api/v1/downlink/sessions";
    pub const GROUND_STATIONS: &str = "/api/v1/ground-stations";
    pub const HEALTH: &str = "/api/v1/health";
}

#[derive(Debug, Deserialize)]
struct NextPassResponse {
    #[serde(default)]
    pass: Option<PassWindow>,
}

/// Authenticated access to the ground-station simulator.
///
/// Implementations must be safe to share between concurrent tool calls;
/// state lives upstream, never in the implementation.
#[async_trait]
pub trait SimulatorApi: Send + Sync {
    /// GET `path` with query parameters, returning the decoded JSON body
    /// (`Value::Null` for empty bodies).
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;

    /// POST a JSON body to `path`, returning the decoded JSON response.
    async fn post_json(&self, path: &str, body: Value) -> Result<Value>;

    /// Current simulated time plus in-progress passes
    async fn simulation_state(&self) -> Result<SimulationState> {
        let body = self.get_json(endpoints::SIMULATION_STATE, &[]).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Next scheduled pass for `target`; `None` when nothing is scheduled
    async fn next_pass(&self, target: &ContactTarget) -> Result<Option<PassWindow>> {
        let query = [
            ("satellite_id", target.satellite_id.clone()),
            ("ground_station_id", target.ground_station_id.clone()),
        ];
        match self.get_json(endpoints::NEXT_PASS, &query).await {
            Ok(Value::Null) => Ok(None),
            Ok(body) => Ok(serde_json::from_value::<NextPassResponse>(body)?.pass),
            Err(TrenchError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
