//! Clocks and cancel-and-reschedule timers
//!
//! Timers here never run on their own. They hold a deadline and are polled
//! by their owner (typically once per frame and on every event entry point)
//! against a [`Clock`]. Scheduling always replaces the previous deadline, so
//! a timer can never fire twice for one quiet period.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move time forward. Negative values are ignored.
    pub fn advance(&self, ms: f64) {
        if ms > 0.0 {
            self.now.set(self.now.get() + ms);
        }
    }

    /// Jump to an absolute time, never backwards
    pub fn set(&self, ms: f64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// A single pending deadline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timeout {
    deadline: Option<f64>,
}

impl Timeout {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timeout `delay_ms` after `now_ms`, replacing any pending one
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) {
        self.deadline = Some(now_ms + delay_ms.max(0.0));
    }

    /// Disarm. Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Returns true exactly once when the deadline has passed, disarming it
    pub fn fire_if_due(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Trailing-edge debounce: only the last call inside the window fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    timeout: Timeout,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            timeout: Timeout::new(),
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Record a call; restarts the quiet window
    pub fn call(&mut self, now_ms: f64) {
        self.timeout.schedule(now_ms, self.delay_ms);
    }

    /// Returns true once the quiet window after the last call has elapsed
    pub fn poll(&mut self, now_ms: f64) -> bool {
        self.timeout.fire_if_due(now_ms)
    }

    pub fn cancel(&mut self) {
        self.timeout.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.timeout.is_pending()
    }
}
