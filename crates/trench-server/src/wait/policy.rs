// crates/trench-server/src/wait/policy.rs
// Poll cadence, retry budget and backoff for condition waits

use std::time::Duration;

/// Default delay between successful polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default number of consecutive failed polls tolerated before giving up
pub const DEFAULT_RETRY_BUDGET: u32 = 5;
/// Default delay after the first failed poll (doubles each consecutive failure)
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);
/// Default cap on the retry delay
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(10);

/// Tuning for one wait call. Copied into each call; never shared mutably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    /// Consecutive failed polls absorbed before the wait fails
    pub retry_budget: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_budget: DEFAULT_RETRY_BUDGET,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_max: DEFAULT_BACKOFF_MAX,
        }
    }
}

impl WaitPolicy {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.backoff_base, self.backoff_max)
    }
}

/// Capped exponential backoff. Reset after every successful poll.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    next: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let max = max.max(base);
        Self {
            base,
            max,
            next: base,
        }
    }

    /// Delay to sleep before the next retry; doubles up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = self.next.saturating_mul(2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.next = self.base;
    }
}
