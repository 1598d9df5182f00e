//! Progress clock and the seek quiescence guard.

use std::time::{Duration, Instant};

/// Fixed-interval recurring task that exists only while a track is playing.
///
/// Dropping it is the cancellation; the session replaces it with `None` on
/// every transition out of `Playing`.
#[derive(Debug, Clone)]
pub struct ProgressClock {
    interval: Duration,
    next_tick: Instant,
}

impl ProgressClock {
    pub fn start(now: Instant, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next_tick: now + interval,
        }
    }

    pub fn due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// Schedule the next tick after `now`, dropping any ticks that were missed.
    pub fn advance(&mut self, now: Instant) {
        while self.next_tick <= now {
            self.next_tick += self.interval;
        }
    }

    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Time-based guard that keeps clock reads from overwriting a fresh seek.
#[derive(Debug, Clone)]
pub struct SeekGuard {
    window: Duration,
    until: Option<Instant>,
}

impl SeekGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: None,
        }
    }

    /// (Re)open the window; a later seek simply extends it.
    pub fn arm(&mut self, now: Instant) {
        self.until = Some(now + self.window);
    }

    pub fn active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// End of the open window, if one was armed and not yet cleared.
    pub fn until(&self) -> Option<Instant> {
        self.until
    }

    pub fn clear(&mut self) {
        self.until = None;
    }
}
