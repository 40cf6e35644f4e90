//! Debounced callback primitive
//!
//! A `Debounce` holds at most one pending deadline. Scheduling again replaces
//! the pending deadline, and `poll` reports `true` exactly once when it has
//! passed. The caller supplies the clock so the primitive stays testable and
//! fits a frame-driven UI loop.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Schedule a firing `delay` from `now`, cancelling any pending one
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Time left until the pending deadline, if any
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` once when the pending deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
