//! Non-positional `(version, store)` identifier.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crdt::codec::{DUPLEX_UNITS, decode_duplex, encode_duplex};
use crate::crdt::surrogate::{canonicalize, write_escaped};
use crate::crdt::types::clock::Version;
use crate::crdt::types::store::StoreId;
use crate::error::{IdError, Result};

/// A unique name built from a store's version and its store id.
///
/// Carries no position semantics. Two duplex ids are equal exactly when their
/// `(version, store)` pairs are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DuplexId {
    units: [u16; DUPLEX_UNITS],
}

impl DuplexId {
    /// Creates a duplex id, rejecting versions wider than 48 bits.
    pub fn new(version: Version, store: StoreId) -> Result<Self> {
        Ok(DuplexId {
            units: encode_duplex(version, store)?,
        })
    }

    /// Parses a storage string produced by this crate.
    pub fn parse(stored: &str) -> Result<Self> {
        let canonical = canonicalize(stored)?;
        let units: [u16; DUPLEX_UNITS] = canonical.as_slice().try_into().map_err(|_| {
            IdError::invalid(format!(
                "duplex id must be {DUPLEX_UNITS} code units, got {}",
                canonical.len()
            ))
        })?;
        Ok(DuplexId { units })
    }

    pub fn version(&self) -> Version {
        decode_duplex(&self.units).0
    }

    pub fn store(&self) -> StoreId {
        decode_duplex(&self.units).1
    }
}

impl fmt::Display for DuplexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, &self.units)
    }
}

impl FromStr for DuplexId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self> {
        DuplexId::parse(s)
    }
}

impl Serialize for DuplexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DuplexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let stored = String::deserialize(deserializer)?;
        DuplexId::parse(&stored).map_err(D::Error::custom)
    }
}
