// crates/trench-server/src/wait/mod.rs
// Condition-wait controller: hold a tool call until simulated time satisfies a condition
//
// Simulated time is owned by the remote simulator and can jump backwards when
// the simulation restarts. Each wait polls it sequentially (one request in
// flight at a time), treats a backwards jump as a restart rather than as
// progress, absorbs transient poll failures up to a retry budget and stops
// promptly when its cancellation token fires.

pub mod clock;
pub mod policy;

pub use clock::{ClockReading, ClockWatch};
pub use policy::{Backoff, WaitPolicy};

use crate::error::{Result, TrenchError};
use crate::sim::SimulatorApi;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trench_types::{ContactTarget, PassWindow, SimulationState, WaitFailureReason, WaitReport};

/// What a wait call is waiting for. Created per call and consumed once.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitRequest {
    /// Simulated time reaches this value (seconds since epoch)
    UntilTime(f64),
    /// The next pass for this satellite / ground station pair begins
    NextPass(ContactTarget),
}

impl WaitRequest {
    /// Validated absolute-time request. Targets already in the past are fine.
    pub fn until_time(target_sim_time: f64) -> Result<Self> {
        if !target_sim_time.is_finite() || target_sim_time < 0.0 {
            return Err(TrenchError::InvalidInput(format!(
                "target_sim_time must be a finite, non-negative number of seconds (got {})",
                target_sim_time
            )));
        }
        Ok(Self::UntilTime(target_sim_time))
    }
}

/// Terminal failure of a wait
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaitFailure {
    #[error("no pass scheduled for {} over {}", .0.satellite_id, .0.ground_station_id)]
    NoPassScheduled(ContactTarget),

    #[error("gave up after {attempts} consecutive failed polls: {last_error}")]
    RetryBudgetExhausted { attempts: u32, last_error: String },
}

impl WaitFailure {
    pub fn reason(&self) -> WaitFailureReason {
        match self {
            WaitFailure::NoPassScheduled(_) => WaitFailureReason::NoPassScheduled,
            WaitFailure::RetryBudgetExhausted { .. } => WaitFailureReason::RetryBudgetExhausted,
        }
    }
}

/// The condition was observed true.
#[derive(Debug, Clone, PartialEq)]
pub struct Satisfied {
    /// Simulated time of the satisfying observation. May overshoot the
    /// target by up to one poll interval.
    pub observed_time: f64,
    /// Wall-clock time of the satisfying observation
    pub observed_at: DateTime<Utc>,
    pub waited: Duration,
    /// Successful state polls, including the satisfying one
    pub polls: u32,
    /// Simulation restarts seen during the wait
    pub restarts: u32,
    /// Simulated time the condition targeted (the AOS for pass waits)
    pub target_sim_time: f64,
    pub pass: Option<PassWindow>,
    /// The pass was already in progress when the call was made
    pub already_active: bool,
}

/// Terminal state of one wait call
#[derive(Debug, Clone, PartialEq)]
pub enum WaitResult {
    Satisfied(Satisfied),
    Cancelled {
        last_observed: Option<f64>,
        waited: Duration,
        polls: u32,
    },
    Failed {
        failure: WaitFailure,
        waited: Duration,
    },
}

impl WaitResult {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitResult::Satisfied(_))
    }

    pub fn into_report(self) -> WaitReport {
        match self {
            WaitResult::Satisfied(s) => WaitReport::Satisfied {
                target_sim_time: Some(s.target_sim_time),
                observed_time: s.observed_time,
                waited_seconds: s.waited.as_secs_f64(),
                observed_at: s.observed_at.to_rfc3339(),
                polls: s.polls,
                restarts: s.restarts,
                pass: s.pass,
                already_active: s.already_active,
            },
            WaitResult::Cancelled {
                last_observed,
                waited,
                polls,
            } => WaitReport::Cancelled {
                last_observed_time: last_observed,
                waited_seconds: waited.as_secs_f64(),
                polls,
                ceiling_reached: false,
            },
            WaitResult::Failed { failure, waited } => WaitReport::Failed {
                reason: failure.reason(),
                detail: failure.to_string(),
                waited_seconds: waited.as_secs_f64(),
            },
        }
    }
}

/// Runs wait calls against a simulator. Cheap to clone; holds no per-call state.
#[derive(Clone)]
pub struct WaitController {
    sim: Arc<dyn SimulatorApi>,
    policy: WaitPolicy,
}

impl WaitController {
    pub fn new(sim: Arc<dyn SimulatorApi>, policy: WaitPolicy) -> Self {
        Self { sim, policy }
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Return once simulated time >= `target_sim_time`.
    ///
    /// Only invalid input is an `Err`; every other ending is a `WaitResult`.
    pub async fn wait_until_time(
        &self,
        target_sim_time: f64,
        cancel: &CancellationToken,
    ) -> Result<WaitResult> {
        let request = WaitRequest::until_time(target_sim_time)?;
        Ok(self.run(request, cancel).await)
    }

    /// Return once the next pass for `target` begins, or immediately if one
    /// is already in progress.
    pub async fn wait_for_next_pass(
        &self,
        target: ContactTarget,
        cancel: &CancellationToken,
    ) -> WaitResult {
        self.run(WaitRequest::NextPass(target), cancel).await
    }

    pub async fn run(&self, request: WaitRequest, cancel: &CancellationToken) -> WaitResult {
        let run = WaitRun {
            sim: self.sim.as_ref(),
            policy: self.policy,
            cancel,
            started: Instant::now(),
            backoff: self.policy.backoff(),
            clock: ClockWatch::default(),
            polls: 0,
            restarts: 0,
        };
        match request {
            WaitRequest::UntilTime(target) => run.until_time(target).await,
            WaitRequest::NextPass(target) => run.next_pass(target).await,
        }
    }
}

/// Drop a pass whose LOS is already behind `now`; it can no longer start.
fn discard_ended(pass: Option<PassWindow>, now: f64) -> Option<PassWindow> {
    match pass {
        Some(pass) if now > pass.los => {
            debug!(pass_id = %pass.pass_id, los = pass.los, now, "Ignoring pass that has already ended");
            None
        }
        other => other,
    }
}

/// Either a value to keep working with, or the wait is over.
enum Step<T> {
    Ready(T),
    Stop(WaitResult),
}

/// A successful state poll
struct Observation {
    state: SimulationState,
    restarted: bool,
}

/// Per-call state. Owned by exactly one wait; never shared.
struct WaitRun<'a> {
    sim: &'a dyn SimulatorApi,
    policy: WaitPolicy,
    cancel: &'a CancellationToken,
    started: Instant,
    backoff: Backoff,
    clock: ClockWatch,
    polls: u32,
    restarts: u32,
}

impl WaitRun<'_> {
    async fn until_time(mut self, target: f64) -> WaitResult {
        info!(
            target_sim_time = target,
            poll_interval_ms = self.policy.poll_interval.as_millis() as u64,
            "Waiting for simulated time"
        );

        loop {
            let obs = match self.poll_state().await {
                Step::Ready(obs) => obs,
                Step::Stop(result) => return result,
            };
            let now = obs.state.sim_time;
            if obs.restarted {
                debug!(target_sim_time = target, now, "Target re-evaluated against restarted clock");
            }
            if now >= target {
                return self.satisfied(now, target, None, false);
            }
            if !self.pause(self.policy.poll_interval).await {
                return self.cancelled();
            }
        }
    }

    async fn next_pass(mut self, target: ContactTarget) -> WaitResult {
        info!(
            satellite_id = %target.satellite_id,
            ground_station_id = %target.ground_station_id,
            "Waiting for next pass"
        );

        let first = match self.poll_state().await {
            Step::Ready(obs) => obs,
            Step::Stop(result) => return result,
        };
        let now = first.state.sim_time;

        // An in-progress pass wins before asking for "next", which the
        // schedule may define as strictly future.
        if let Some(active) = first.state.active_pass_for(&target) {
            info!(pass_id = %active.pass_id, now, "Pass already in progress");
            let active = active.clone();
            return self.satisfied(now, active.aos, Some(active), true);
        }

        // No pass at call time is the only schedule answer that fails the wait.
        let mut pass = match self.fetch_next_pass(&target).await {
            Step::Ready(Some(pass)) => discard_ended(Some(pass), now),
            Step::Ready(None) => return self.failed(WaitFailure::NoPassScheduled(target.clone())),
            Step::Stop(result) => return result,
        };
        if let Some(pass) = pass.take_if(|p| now >= p.aos) {
            let already_active = pass.contains(now);
            return self.satisfied(now, pass.aos, Some(pass), already_active);
        }
        if let Some(pass) = &pass {
            debug!(pass_id = %pass.pass_id, aos = pass.aos, now, "Targeting pass AOS");
        }

        loop {
            if !self.pause(self.policy.poll_interval).await {
                return self.cancelled();
            }
            let obs = match self.poll_state().await {
                Step::Ready(obs) => obs,
                Step::Stop(result) => return result,
            };
            let now = obs.state.sim_time;

            if let Some(active) = obs.state.active_pass_for(&target) {
                let active = active.clone();
                return self.satisfied(now, active.aos, Some(active), false);
            }

            // A restart regenerates the schedule; the old AOS may not
            // correspond to any pass any more.
            if obs.restarted
                && let Some(stale) = pass.take()
            {
                info!(stale_pass = %stale.pass_id, now, "Schedule invalidated by restart");
            }

            if pass.is_none() {
                pass = match self.fetch_next_pass(&target).await {
                    Step::Ready(found) => discard_ended(found, now),
                    Step::Stop(result) => return result,
                };
                match &pass {
                    Some(p) => info!(pass_id = %p.pass_id, aos = p.aos, now, "Targeting pass AOS"),
                    None => debug!(now, "No upcoming pass yet, still polling"),
                }
            } else {
                pass = discard_ended(pass, now);
            }

            if let Some(pass) = pass.take_if(|p| now >= p.aos) {
                return self.satisfied(now, pass.aos, Some(pass), false);
            }
        }
    }

    /// Poll simulation state and run restart detection on the result.
    async fn poll_state(&mut self) -> Step<Observation> {
        let sim = self.sim;
        let state = match self.attempt("simulation_state", || sim.simulation_state()).await {
            Step::Ready(state) => state,
            Step::Stop(result) => return Step::Stop(result),
        };
        self.polls += 1;

        let restarted = match self.clock.observe(state.sim_time) {
            ClockReading::Restarted { previous } => {
                self.restarts += 1;
                info!(previous, now = state.sim_time, "Simulation restart detected");
                true
            }
            ClockReading::First | ClockReading::Advanced => false,
        };
        debug!(poll = self.polls, sim_time = state.sim_time, "Polled simulation state");

        Step::Ready(Observation { state, restarted })
    }

    /// Fetch the next pass; `None` when nothing is scheduled.
    async fn fetch_next_pass(&mut self, target: &ContactTarget) -> Step<Option<PassWindow>> {
        let sim = self.sim;
        self.attempt("next_pass", || sim.next_pass(target)).await
    }

    /// Run one simulator request, retrying failures with backoff until the
    /// retry budget of consecutive failures is spent.
    async fn attempt<T, F, Fut>(&mut self, what: &'static str, mut op: F) -> Step<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cancel = self.cancel;
        let mut failures = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Step::Stop(self.cancelled());
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                outcome = op() => Some(outcome),
            };
            let Some(outcome) = outcome else {
                return Step::Stop(self.cancelled());
            };

            match outcome {
                Ok(value) => {
                    self.backoff.reset();
                    return Step::Ready(value);
                }
                Err(e) => {
                    failures += 1;
                    if failures > self.policy.retry_budget {
                        warn!(what, attempts = failures, status = ?e.status(), error = %e, "Retry budget exhausted");
                        return Step::Stop(self.failed(WaitFailure::RetryBudgetExhausted {
                            attempts: failures,
                            last_error: e.to_string(),
                        }));
                    }
                    let delay = self.backoff.next_delay();
                    warn!(
                        what,
                        attempt = failures,
                        status = ?e.status(),
                        backoff_ms = delay.as_millis() as u64,
                        error = %e,
                        "Poll failed, retrying"
                    );
                    if !self.pause(delay).await {
                        return Step::Stop(self.cancelled());
                    }
                }
            }
        }
    }

    /// Sleep unless cancelled first. Returns false on cancellation.
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    fn satisfied(
        &self,
        observed_time: f64,
        target_sim_time: f64,
        pass: Option<PassWindow>,
        already_active: bool,
    ) -> WaitResult {
        let waited = self.started.elapsed();
        info!(
            observed_time,
            target_sim_time,
            polls = self.polls,
            restarts = self.restarts,
            waited_ms = waited.as_millis() as u64,
            "Wait satisfied"
        );
        WaitResult::Satisfied(Satisfied {
            observed_time,
            observed_at: Utc::now(),
            waited,
            polls: self.polls,
            restarts: self.restarts,
            target_sim_time,
            pass,
            already_active,
        })
    }

    fn cancelled(&self) -> WaitResult {
        info!(polls = self.polls, last_observed = ?self.clock.last(), "Wait cancelled");
        WaitResult::Cancelled {
            last_observed: self.clock.last(),
            waited: self.started.elapsed(),
            polls: self.polls,
        }
    }

    fn failed(&self, failure: WaitFailure) -> WaitResult {
        warn!(error = %failure, "Wait failed");
        WaitResult::Failed {
            failure,
            waited: self.started.elapsed(),
        }
    }
}
