//! Per-replica id generator.
//!
//! Bundles everything one store needs to mint ids: its store id, its version
//! clock and a seedable random source. All methods take `&self`, so a single
//! generator can be shared between threads.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::crdt::triplex::{generate_between, generate_many};
use crate::crdt::types::{DuplexId, StoreId, TriplexId, Version, VersionClock};
use crate::error::Result;

/// Mints duplex and triplex ids on behalf of a single store.
#[derive(Debug)]
pub struct IdGenerator {
    store: StoreId,
    clock: VersionClock,
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    /// Creates an entropy-seeded generator for `store`.
    pub fn new(store: StoreId) -> Self {
        Self::with_rng(store, 0, StdRng::from_entropy())
    }

    /// Creates a generator whose random choices replay for a given seed.
    pub fn with_seed(store: StoreId, seed: u64) -> Self {
        Self::with_rng(store, 0, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::with_rng(config.store, config.initial_version, rng))
    }

    fn with_rng(store: StoreId, initial_version: Version, rng: StdRng) -> Self {
        IdGenerator {
            store,
            clock: VersionClock::starting_at(store, initial_version),
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> StoreId {
        self.store
    }

    /// Gets the last version handed out or observed.
    pub fn current_version(&self) -> Version {
        self.clock.current()
    }

    /// Mints a fresh duplex id under a new version.
    pub fn duplex_id(&self) -> Result<DuplexId> {
        let version = self.clock.tick()?;
        DuplexId::new(version, self.store)
    }

    /// Mints one position key strictly between `lower` and `upper`.
    pub fn triplex_id(
        &self,
        lower: Option<&TriplexId>,
        upper: Option<&TriplexId>,
    ) -> Result<TriplexId> {
        let version = self.clock.tick()?;
        let id = generate_between(&mut *self.rng.lock(), version, self.store, lower, upper)?;
        debug!(store = self.store, version, depth = id.depth(), "minted triplex id");
        Ok(id)
    }

    /// Mints `n` increasing position keys between `lower` and `upper`.
    ///
    /// The whole batch shares one version: it belongs to a single insertion.
    pub fn triplex_ids(
        &self,
        n: usize,
        lower: Option<&TriplexId>,
        upper: Option<&TriplexId>,
    ) -> Result<Vec<TriplexId>> {
        let version = self.clock.tick()?;
        let ids = generate_many(&mut *self.rng.lock(), n, version, self.store, lower, upper)?;
        debug!(store = self.store, version, count = ids.len(), "minted triplex batch");
        Ok(ids)
    }

    /// Advances the clock past every version recorded in a remote id.
    pub fn observe(&self, id: &TriplexId) {
        for triplet in id.triplets() {
            self.clock.observe(triplet.version);
        }
    }
}
