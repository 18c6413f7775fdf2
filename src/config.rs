//! Generator configuration.
//!
//! A replica is configured with its store id and, optionally, a fixed RNG seed
//! (replayable id sequences in tests and simulations) and the version to resume
//! its clock from.

use serde::{Deserialize, Serialize};

use crate::crdt::types::{StoreId, Version, check_uint48};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Store id stamped into every minted triplet
    pub store: StoreId,
    /// Fixed RNG seed; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Last version already used by this store
    #[serde(default)]
    pub initial_version: Version,
}

impl GeneratorConfig {
    pub fn new(store: StoreId) -> Self {
        GeneratorConfig {
            store,
            seed: None,
            initial_version: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_version(mut self, version: Version) -> Self {
        self.initial_version = version;
        self
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_uint48("initial_version", self.initial_version)
    }
}
