// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Fixed-timestep accumulator. Callers feed it measured elapsed time; it
/// never reads a clock itself. Only the remainder below one interval is
/// carried over, so a stall yields a single late tick rather than a burst.
#[derive(Clone, Debug)]
pub struct Scheduler {
    interval: Duration,
    acc: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            acc: Duration::ZERO,
        }
    }

    /// Adds `elapsed` and returns whether a tick is due, consuming it.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.acc = self.acc.saturating_add(elapsed);
        if self.acc < self.interval {
            return false;
        }
        self.acc -= self.interval;
        if self.acc >= self.interval {
            self.acc = Duration::ZERO;
        }
        true
    }

    pub fn time_until_next(&self) -> Duration {
        self.interval.saturating_sub(self.acc)
    }

    pub fn reset(&mut self) {
        self.acc = Duration::ZERO;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

/// Where the game loop reads the current time.
pub trait Clock {
    fn now(&mut self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}
