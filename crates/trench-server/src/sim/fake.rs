// crates/trench-server/src/sim/fake.rs
// Scripted in-memory simulator for unit tests

use super::SimulatorApi;
use crate::error::{Result, TrenchError};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use trench_types::{ContactTarget, PassWindow, SimulationState};

/// One scripted response to `simulation_state`
#[derive(Debug, Clone)]
pub(crate) enum Poll {
    /// Report this simulated time (no active passes)
    At(f64),
    /// Report this simulated time with passes in progress
    Active(f64, Vec<PassWindow>),
    /// Fail the poll with a 503
    Fail,
}

/// A recorded generic request: (method, path, query or body)
pub(crate) type Recorded = (String, String, Value);

pub(crate) struct FakeSimulator {
    script: Mutex<VecDeque<Poll>>,
    /// (current time, advance applied before each unscripted read)
    clock: Mutex<(f64, f64)>,
    next_passes: Mutex<VecDeque<Option<PassWindow>>>,
    requests: Mutex<Vec<Recorded>>,
    pub state_calls: AtomicU32,
    pub pass_calls: AtomicU32,
}

impl FakeSimulator {
    /// Clock that starts at `start` and advances `rate` before every read.
    pub fn ticking(start: f64, rate: f64) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            clock: Mutex::new((start, rate)),
            next_passes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            state_calls: AtomicU32::new(0),
            pass_calls: AtomicU32::new(0),
        }
    }

    /// Clock that never moves.
    pub fn frozen(at: f64) -> Self {
        Self::ticking(at, 0.0)
    }

    /// Scripted polls first; once drained, the clock continues from the
    /// last scripted time at `rate` per read.
    pub fn scripted(polls: Vec<Poll>, rate: f64) -> Self {
        let start = polls
            .iter()
            .rev()
            .find_map(|p| match p {
                Poll::At(t) | Poll::Active(t, _) => Some(*t),
                Poll::Fail => None,
            })
            .unwrap_or(0.0);
        let fake = Self::ticking(start, rate);
        *fake.script.lock().unwrap() = polls.into();
        fake
    }

    /// Queue next-pass answers; the last one repeats.
    pub fn with_next_passes(self, passes: Vec<Option<PassWindow>>) -> Self {
        *self.next_passes.lock().unwrap() = passes.into();
        self
    }

    pub fn state_calls(&self) -> u32 {
        self.state_calls.load(Ordering::SeqCst)
    }

    pub fn pass_calls(&self) -> u32 {
        self.pass_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

pub(crate) fn pass(id: &str, aos: f64, los: f64) -> PassWindow {
    PassWindow {
        pass_id: id.to_string(),
        satellite_id: "SAT-1".to_string(),
        ground_station_id: "GS-1".to_string(),
        aos,
        los,
        max_elevation: Some(42.0),
    }
}

pub(crate) fn target() -> ContactTarget {
    ContactTarget {
        satellite_id: "SAT-1".to_string(),
        ground_station_id: "GS-1".to_string(),
    }
}

#[async_trait]
impl SimulatorApi for FakeSimulator {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let query: serde_json::Map<String, Value> = query
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        self.requests
            .lock()
            .unwrap()
            .push(("GET".into(), path.to_string(), Value::Object(query)));
        Ok(json!({ "ok": true, "path": path }))
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value> {
        self.requests
            .lock()
            .unwrap()
            .push(("POST".into(), path.to_string(), body));
        Ok(json!({ "ok": true, "path": path }))
    }

    async fn simulation_state(&self) -> Result<SimulationState> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.script.lock().unwrap().pop_front();
        let (sim_time, active_passes) = match scripted {
            Some(Poll::Fail) => {
                return Err(TrenchError::Api {
                    status: 503,
                    body: "scripted failure".into(),
                });
            }
            Some(Poll::At(t)) => (t, Vec::new()),
            Some(Poll::Active(t, passes)) => (t, passes),
            None => {
                let mut clock = self.clock.lock().unwrap();
                clock.0 += clock.1;
                (clock.0, Vec::new())
            }
        };

        Ok(SimulationState {
            sim_time,
            running: true,
            active_passes,
        })
    }

    async fn next_pass(&self, _target: &ContactTarget) -> Result<Option<PassWindow>> {
        self.pass_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.next_passes.lock().unwrap();
        if queue.len() > 1 {
            Ok(queue.pop_front().flatten())
        } else {
            Ok(queue.front().cloned().flatten())
        }
    }
}
