use std::thread;
use std::time::{Duration, Instant};

use motes_platform::FrameClock;
use tracing::trace;

/// Sleeps away whatever is left of a fixed interval.
///
/// Deadlines advance by whole intervals so short jitter does not accumulate.
/// A tick that overruns its slot moves the schedule instead of bursting to
/// catch up.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    interval: Duration,
    deadline: Instant,
}

impl IntervalClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: Instant::now() + interval,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameClock for IntervalClock {
    fn wait(&mut self) {
        let now = Instant::now();
        if let Some(left) = self.deadline.checked_duration_since(now) {
            thread::sleep(left);
            self.deadline += self.interval;
        } else {
            trace!(behind_ms = (now - self.deadline).as_millis() as u64, "frame overran its slot");
            self.deadline = now + self.interval;
        }
    }
}

/// Never waits; frames are produced as fast as the driver runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl FrameClock for Unpaced {
    fn wait(&mut self) {}
}
