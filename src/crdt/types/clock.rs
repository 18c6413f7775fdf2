//! Thread-safe version clock for a single store.
//!
//! Each store owns a private, never-reused, monotonically increasing version
//! counter. Versions feed both duplex ids (where they guarantee uniqueness) and
//! triplets (where they break ties between equal paths).

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::crdt::types::store::StoreId;
use crate::crdt::types::triplet::MAX_VERSION;
use crate::error::{IdError, Result};

/// A logical version; only the low 48 bits are usable.
pub type Version = u64;

/// A thread-safe Lamport-style clock handing out versions for one store
#[derive(Debug)]
pub struct VersionClock {
    counter: AtomicU64,
    store: StoreId,
}

impl VersionClock {
    /// Creates a new clock starting at version zero
    pub fn new(store: StoreId) -> Self {
        Self::starting_at(store, 0)
    }

    /// Creates a clock whose next tick returns `current + 1`
    pub fn starting_at(store: StoreId, current: Version) -> Self {
        VersionClock {
            counter: AtomicU64::new(current),
            store,
        }
    }

    /// Returns the next version for this store
    pub fn tick(&self) -> Result<Version> {
        let previous = self
            .counter
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |current| {
                (current < MAX_VERSION).then_some(current + 1)
            })
            .map_err(|_| IdError::ClockExhausted(self.store))?;
        Ok(previous + 1)
    }

    /// Advances the clock to at least a version observed from another store
    pub fn observe(&self, received: Version) {
        let received = received.min(MAX_VERSION);
        self.counter.fetch_max(received, AtomicOrdering::SeqCst);
    }

    /// Gets the last version handed out or observed
    pub fn current(&self) -> Version {
        self.counter.load(AtomicOrdering::SeqCst)
    }

    /// Gets the store ID
    pub fn store(&self) -> StoreId {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_clock() {
        let clock = VersionClock::new(1);

        let v1 = clock.tick().unwrap();
        let v2 = clock.tick().unwrap();

        assert_eq!(v1, 1);
        assert_eq!(v1 + 1, v2);
        assert_eq!(clock.current(), 2);
    }

    #[test]
    fn test_version_clock_observe() {
        let clock = VersionClock::new(1);

        // Simulate seeing a version from a store that is further ahead
        clock.observe(100);
        let next = clock.tick().unwrap();
        assert_eq!(next, 101);

        // Observing an older version never moves the clock backwards
        clock.observe(5);
        assert_eq!(clock.current(), 101);
    }

    #[test]
    fn test_clock_exhaustion() {
        let clock = VersionClock::starting_at(3, MAX_VERSION - 1);

        assert_eq!(clock.tick().unwrap(), MAX_VERSION);
        let err = clock.tick().unwrap_err();
        assert!(matches!(err, IdError::ClockExhausted(3)));
        // A failed tick leaves the counter untouched
        assert_eq!(clock.current(), MAX_VERSION);
    }

    #[test]
    fn test_observe_clamps_to_48_bits() {
        let clock = VersionClock::new(1);
        clock.observe(u64::MAX);
        assert_eq!(clock.current(), MAX_VERSION);
    }

    #[test]
    fn test_clock_store() {
        let clock = VersionClock::new(42);
        assert_eq!(clock.store(), 42);
    }
}
