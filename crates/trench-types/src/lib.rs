// crates/trench-types/src/lib.rs
// Shared types for Trench (simulator-facing values and wait reports)
// No native-only dependencies allowed here

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════
// SIMULATION TYPES
// ═══════════════════════════════════════

/// One contact opportunity between a satellite and a ground station.
///
/// Times are simulated seconds since the simulator epoch. A pass window is
/// immutable once returned; a simulation restart invalidates every window
/// previously fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassWindow {
    pub pass_id: String,
    pub satellite_id: String,
    pub ground_station_id: String,
    /// Acquisition of signal
    pub aos: f64,
    /// Loss of signal
    pub los: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_elevation: Option<f64>,
}

impl PassWindow {
    /// True if `sim_time` falls inside `[aos, los]`.
    pub fn contains(&self, sim_time: f64) -> bool {
        self.aos <= sim_time && sim_time <= self.los
    }

    /// True if this window belongs to the given satellite/station pair.
    pub fn serves(&self, target: &ContactTarget) -> bool {
        self.satellite_id == target.satellite_id
            && self.ground_station_id == target.ground_station_id
    }
}

/// Snapshot of the simulator as seen by one poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Current simulated time, seconds since epoch
    #[serde(alias = "current_time", alias = "time")]
    pub sim_time: f64,
    #[serde(default = "default_running")]
    pub running: bool,
    /// Passes in progress at `sim_time`
    #[serde(default)]
    pub active_passes: Vec<PassWindow>,
}

fn default_running() -> bool {
    true
}

impl SimulationState {
    /// The in-progress pass for `target`, if any.
    pub fn active_pass_for(&self, target: &ContactTarget) -> Option<&PassWindow> {
        self.active_passes
            .iter()
            .find(|p| p.serves(target) && p.contains(self.sim_time))
    }
}

/// Satellite / ground station pair a pass-aware operation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTarget {
    pub satellite_id: String,
    pub ground_station_id: String,
}

// ═══════════════════════════════════════
// WAIT REPORTS
// ═══════════════════════════════════════

/// Why a wait ended in the failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitFailureReason {
    NoPassScheduled,
    RetryBudgetExhausted,
}

/// Serializable outcome of a wait tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WaitReport {
    Satisfied {
        #[serde(skip_serializing_if = "Option::is_none")]
        target_sim_time: Option<f64>,
        observed_time: f64,
        waited_seconds: f64,
        /// Wall-clock time of the satisfying observation (RFC 3339)
        observed_at: String,
        polls: u32,
        restarts: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        pass: Option<PassWindow>,
        #[serde(default)]
        already_active: bool,
    },
    Cancelled {
        #[serde(skip_serializing_if = "Option::is_none")]
        last_observed_time: Option<f64>,
        waited_seconds: f64,
        polls: u32,
        /// Cancelled by the server's wait ceiling rather than the caller
        #[serde(default)]
        ceiling_reached: bool,
    },
    Failed {
        reason: WaitFailureReason,
        detail: String,
        waited_seconds: f64,
    },
}

impl WaitReport {
    pub fn is_failed(&self) -> bool {
        matches!(self, WaitReport::Failed { .. })
    }
}
