//! Search control: stop flag and time budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// How often, in nodes, the clock is consulted.
const CLOCK_CHECK_MASK: u64 = 1023;

/// Controls when a search should stop.
///
/// The soft limit is the time budget: once it has passed, no new
/// iteration starts. The optional hard limit aborts an iteration in
/// progress. The stop flag can also be raised from another thread.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
}

impl SearchControl {
    /// Control without time limits; only the stop flag ends the search.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
        }
    }

    /// Control with a time budget and optional hard limit; the clock starts now.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Option<Duration>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: Some(soft),
            hard_limit: hard,
        }
    }

    /// Check whether the search should abort immediately.
    ///
    /// The clock is read only every 1024 nodes. When the hard limit fires
    /// the stop flag is raised, so later calls return at once.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if nodes & CLOCK_CHECK_MASK != 0 {
            return false;
        }
        if let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }
        false
    }

    /// Check whether iterative deepening may start another iteration.
    pub fn should_stop_iterating(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        self.soft_limit.is_some_and(|soft| self.elapsed() > soft)
    }

    /// Whether the stop flag is raised.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Raise the stop flag.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Reference to the shared stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}
