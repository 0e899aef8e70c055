//! Single-slot debounce scheduling.
//!
//! A `Debouncer` owns at most one pending fire. Every `schedule` replaces
//! the previous one and hands out a fresh token; when a timer expires the
//! host passes its token back to `fire`, which only succeeds for the most
//! recently scheduled token. Only the trailing event in a burst fires.
//!
//! The debouncer holds no timer itself. The host arms a real timer (a
//! `gloo_timers::callback::Timeout` in the browser) for `delay()` and calls
//! `fire` when it expires.

use std::time::Duration;

/// Identifies one scheduled fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceToken(u64);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<u64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Quiet period the host timer should wait before firing.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule (or reschedule) the pending fire. Any earlier token goes stale.
    pub fn schedule(&mut self) -> DebounceToken {
        self.generation += 1;
        self.pending = Some(self.generation);
        DebounceToken(self.generation)
    }

    /// Drop the pending fire, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a fire is waiting on its timer.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending fire if `token` is the current one.
    ///
    /// Returns false for stale or cancelled tokens.
    pub fn fire(&mut self, token: DebounceToken) -> bool {
        if self.pending == Some(token.0) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
