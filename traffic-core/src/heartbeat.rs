//! Liveness from periodic PFLAU heartbeats.

use std::time::{Duration, Instant};

use crate::config::HEARTBEAT_TIMEOUT;

/// Tracks the most recent heartbeat.
///
/// `has_heartbeat` is true on `[t, t + timeout)` after a heartbeat at `t`.
/// The monitor is independent from connectivity: a connected device that
/// stops sending heartbeats is observable as such.
#[derive(Debug, Clone)]
pub struct HeartbeatMonitor {
    timeout: Duration,
    last: Option<Instant>,
    /// Value last reported to the caller.
    reported: bool,
}

impl Default for HeartbeatMonitor {
    fn default() -> Self {
        Self::new(HEARTBEAT_TIMEOUT)
    }
}

impl HeartbeatMonitor {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last: None,
            reported: false,
        }
    }

    /// Record a heartbeat and re-arm the watch.
    ///
    /// Returns `true` if the liveness flag changed to true.
    pub fn record(&mut self, now: Instant) -> bool {
        self.last = Some(now);
        let changed = !self.reported;
        self.reported = true;
        changed
    }

    /// Whether a heartbeat was seen less than `timeout` before `now`.
    #[must_use]
    pub fn has_heartbeat(&self, now: Instant) -> bool {
        self.reported
            && self
                .last
                .is_some_and(|last| now.saturating_duration_since(last) < self.timeout)
    }

    /// Fire the watch if it expired.
    ///
    /// Returns `true` if the liveness flag changed to false.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.reported && !self.has_heartbeat(now) {
            self.reported = false;
            return true;
        }
        false
    }

    /// Disarm the watch.
    ///
    /// Returns `true` if the liveness flag changed to false.
    pub fn stop(&mut self) -> bool {
        self.last = None;
        let changed = self.reported;
        self.reported = false;
        changed
    }

    /// Time of the last heartbeat since the watch was armed.
    #[inline]
    #[must_use]
    pub fn last_heartbeat(&self) -> Option<Instant> {
        self.last
    }

    /// When the watch fires if no further heartbeat arrives.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.last
            .filter(|_| self.reported)
            .map(|last| last + self.timeout)
    }
}
