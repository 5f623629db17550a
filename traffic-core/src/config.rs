//! Tunables for a traffic data source.

use std::time::Duration;

/// A heartbeat older than this no longer counts as live.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default lifetime of a traffic factor without updates.
pub const DEFAULT_FACTOR_EXPIRY: Duration = Duration::from_secs(10);

/// Default upper bound on tracked targets.
pub const DEFAULT_MAX_TARGETS: usize = 64;

/// Default age limit for the own position used to place traffic.
pub const DEFAULT_OWN_POSITION_MAX_AGE: Duration = Duration::from_secs(5);

/// Default age limit for a GGA altitude merged into a position.
pub const DEFAULT_FIX_ALTITUDE_MAX_AGE: Duration = Duration::from_secs(5);

/// Configuration of a [`TrafficDataSource`](crate::TrafficDataSource).
///
/// Passed at construction; nothing is read from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceConfig {
    /// Traffic factors not updated for this long are removed.
    pub factor_expiry: Duration,
    /// Maximum number of tracked targets. When full, the stalest target is
    /// evicted to make room.
    pub max_targets: usize,
    /// Own positions older than this are not used to place traffic.
    pub own_position_max_age: Duration,
    /// GGA altitudes older than this are not merged into positions.
    pub fix_altitude_max_age: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            factor_expiry: DEFAULT_FACTOR_EXPIRY,
            max_targets: DEFAULT_MAX_TARGETS,
            own_position_max_age: DEFAULT_OWN_POSITION_MAX_AGE,
            fix_altitude_max_age: DEFAULT_FIX_ALTITUDE_MAX_AGE,
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn with_factor_expiry(mut self, expiry: Duration) -> Self {
        self.factor_expiry = expiry;
        self
    }

    #[must_use]
    pub fn with_max_targets(mut self, max_targets: usize) -> Self {
        self.max_targets = max_targets;
        self
    }
}
