// crates/trench-server/src/wait/clock.rs
// Restart detection over successive simulated-clock observations

/// What one observation says about the simulated clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockReading {
    /// First observation of this wait
    First,
    /// Equal to or later than the previous observation
    Advanced,
    /// Earlier than the previous observation: the simulation was reset
    Restarted { previous: f64 },
}

/// Tracks the last observed simulated time for a single wait call.
#[derive(Debug, Default, Clone)]
pub struct ClockWatch {
    last: Option<f64>,
}

impl ClockWatch {
    pub fn observe(&mut self, now: f64) -> ClockReading {
        let reading = match self.last {
            None => ClockReading::First,
            Some(previous) if now < previous => ClockReading::Restarted { previous },
            Some(_) => ClockReading::Advanced,
        };
        self.last = Some(now);
        reading
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_progress() {
        let mut watch = ClockWatch::default();
        assert_eq!(watch.observe(10.0), ClockReading::First);
        assert_eq!(watch.observe(10.0), ClockReading::Advanced);
        assert_eq!(watch.observe(25.0), ClockReading::Advanced);
        assert_eq!(watch.last(), Some(25.0));
    }

    #[test]
    fn test_restart_detected_then_tracks_new_epoch() {
        let mut watch = ClockWatch::default();
        watch.observe(200.0);
        assert_eq!(watch.observe(0.0), ClockReading::Restarted { previous: 200.0 });
        assert_eq!(watch.observe(5.0), ClockReading::Advanced);
    }
}
