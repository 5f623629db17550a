//! Keyed collection of live traffic factors with expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use flarm_proto::TargetId;

use crate::factor::{FactorUpdate, TrafficFactor};
use crate::samples::GeoPoint;

/// Live traffic factors keyed by target ID.
///
/// At most one factor exists per ID. A factor is removed once it has not
/// been updated for `expiry`, or when the registry is cleared. Every
/// removal is reported through the `on_removed` callback of the mutating
/// call, exactly once per factor.
#[derive(Debug, Clone)]
pub struct FactorRegistry {
    factors: HashMap<TargetId, TrafficFactor>,
    expiry: Duration,
    max_targets: usize,
}

impl FactorRegistry {
    #[must_use]
    pub fn new(expiry: Duration, max_targets: usize) -> Self {
        Self {
            factors: HashMap::new(),
            expiry,
            max_targets: max_targets.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Insert or merge an update, stamping it with `now`.
    ///
    /// When a new ID arrives at capacity, the least recently updated factor
    /// is evicted first and reported through `on_removed`.
    pub fn apply_update<F>(
        &mut self,
        update: &FactorUpdate,
        own_position: Option<GeoPoint>,
        now: Instant,
        mut on_removed: F,
    ) -> &TrafficFactor
    where
        F: FnMut(&TrafficFactor),
    {
        let id = update.id();
        if !self.factors.contains_key(id) && self.factors.len() >= self.max_targets {
            if let Some(stalest) = self.stalest() {
                if let Some(evicted) = self.factors.remove(&stalest) {
                    log::debug!("registry full, evicting {}", evicted.id);
                    on_removed(&evicted);
                }
            }
        }

        self.factors
            .entry(id.clone())
            .and_modify(|factor| factor.merge(update, own_position, now))
            .or_insert_with(|| TrafficFactor::new(update, own_position, now))
    }

    /// Remove every factor whose age reached the expiry.
    ///
    /// Returns the number removed.
    pub fn sweep<F>(&mut self, now: Instant, mut on_removed: F) -> usize
    where
        F: FnMut(&TrafficFactor),
    {
        let expiry = self.expiry;
        let before = self.factors.len();
        self.factors.retain(|_, factor| {
            let live = factor.age(now) < expiry;
            if !live {
                on_removed(factor);
            }
            live
        });
        before - self.factors.len()
    }

    /// Remove all factors.
    pub fn clear<F>(&mut self, mut on_removed: F)
    where
        F: FnMut(&TrafficFactor),
    {
        for (_, factor) in self.factors.drain() {
            on_removed(&factor);
        }
    }

    #[must_use]
    pub fn get(&self, id: &TargetId) -> Option<&TrafficFactor> {
        self.factors.get(id)
    }

    /// Live factors, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TrafficFactor> {
        self.factors.values()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// When the next factor expires, if any.
    #[must_use]
    pub fn next_expiry(&self) -> Option<Instant> {
        self.factors
            .values()
            .map(|factor| factor.last_update + self.expiry)
            .min()
    }

    fn stalest(&self) -> Option<TargetId> {
        self.factors
            .values()
            .min_by_key(|factor| factor.last_update)
            .map(|factor| factor.id.clone())
    }
}
