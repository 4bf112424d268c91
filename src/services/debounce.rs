//! Cancellable deferred action.
//!
//! A [`Debouncer`] holds at most one pending deadline. Every `schedule` call
//! replaces the previous deadline, so only the last trigger can fire, and it
//! fires once: `poll` clears the deadline when it reports expiry. Time is
//! passed in by the caller, which keeps the primitive deterministic; the
//! event loops sleep until [`Debouncer::deadline`] and then poll.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Changes the quiet period for later `schedule` calls; a pending deadline is kept.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// (Re)starts the quiet period at `now`, dropping any earlier pending firing.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once per schedule, when `now` has reached the deadline.
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
