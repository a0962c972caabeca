//! # Adaptive poll interval.
//!
//! The control thread sleeps between reap passes. The sleep starts at the
//! configured interval and shrinks to the fastest task duration observed, so
//! workloads of short tasks are reaped promptly while long tasks cost almost
//! no wakeups.
//!
//! ## Rules
//! - The interval never grows during a run.
//! - The interval never drops below the floor.
//! - The tightened value persists across runs of the same scheduler.

use std::time::Duration;

/// Monotonically non-increasing sleep interval with a lower bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PollInterval {
    current: Duration,
    floor: Duration,
}

impl PollInterval {
    pub(crate) fn new(initial: Duration, floor: Duration) -> Self {
        Self {
            current: initial.max(floor),
            floor,
        }
    }

    pub(crate) fn get(&self) -> Duration {
        self.current
    }

    /// Overrides the interval (still clamped to the floor).
    pub(crate) fn set(&mut self, interval: Duration) {
        self.current = interval.max(self.floor);
    }

    /// Folds in an observed task duration.
    ///
    /// Returns the new interval if it shrank.
    pub(crate) fn observe(&mut self, elapsed: Duration) -> Option<Duration> {
        let next = self.current.min(elapsed).max(self.floor);
        if next < self.current {
            self.current = next;
            Some(next)
        } else {
            None
        }
    }
}
