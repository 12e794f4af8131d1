// crates/trench-server/src/tools/core/test_utils.rs
// Shared test utilities for tool tests

use crate::config::DefaultTargets;
use crate::sim::SimulatorApi;
use crate::sim::fake::FakeSimulator;
use crate::tools::core::ToolContext;
use crate::wait::WaitPolicy;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// MockToolContext
// ============================================================================

pub struct MockToolContext {
    pub fake: Arc<FakeSimulator>,
    simulator: Arc<dyn SimulatorApi>,
    pub defaults: DefaultTargets,
    pub policy: WaitPolicy,
    pub ceiling: Option<Duration>,
}

impl MockToolContext {
    /// Context with SAT-1 / GS-1 as defaults and a 1s poll interval.
    pub fn new(fake: FakeSimulator) -> Self {
        let fake = Arc::new(fake);
        Self {
            simulator: fake.clone(),
            fake,
            defaults: DefaultTargets {
                satellite_id: Some("SAT-1".into()),
                ground_station_id: Some("GS-1".into()),
            },
            policy: WaitPolicy {
                poll_interval: Duration::from_secs(1),
                retry_budget: 2,
                backoff_base: Duration::from_millis(100),
                backoff_max: Duration::from_millis(400),
            },
            ceiling: None,
        }
    }

    /// Same as `new` but with no configured default ids.
    pub fn without_defaults(fake: FakeSimulator) -> Self {
        Self {
            defaults: DefaultTargets::default(),
            ..Self::new(fake)
        }
    }
}

impl ToolContext for MockToolContext {
    fn simulator(&self) -> &Arc<dyn SimulatorApi> {
        &self.simulator
    }

    fn defaults(&self) -> &DefaultTargets {
        &self.defaults
    }

    fn wait_policy(&self) -> WaitPolicy {
        self.policy
    }

    fn wait_ceiling(&self) -> Option<Duration> {
        self.ceiling
    }
}
