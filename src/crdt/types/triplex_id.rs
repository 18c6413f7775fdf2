//! Positional identifier made of one or more triplets.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crdt::codec::{TRIPLET_UNITS, decode_triplet_at, encode_triplet, triplet_count};
use crate::crdt::surrogate::{canonicalize, write_escaped};
use crate::crdt::types::triplet::Triplet;
use crate::error::{IdError, Result};

/// A totally ordered position key.
///
/// The id keeps its canonical (surrogate-stripped) code units. Comparing two
/// ids compares those units lexicographically, which orders triplet sequences
/// pairwise by `(path, version, store)` with a strict prefix sorting first.
/// `Display` and serde use the escaped storage string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriplexId {
    units: Vec<u16>,
}

impl TriplexId {
    /// Parses a storage string produced by this crate.
    pub fn parse(stored: &str) -> Result<Self> {
        Self::from_canonical(canonicalize(stored)?)
    }

    /// Wraps a canonical run, checking that it holds whole triplets.
    pub fn from_canonical(units: Vec<u16>) -> Result<Self> {
        if units.is_empty() {
            return Err(IdError::invalid("empty triplex id"));
        }
        if units.len() % TRIPLET_UNITS != 0 {
            return Err(IdError::invalid(format!(
                "triplex id of {} code units is not a whole number of triplets",
                units.len()
            )));
        }
        Ok(TriplexId { units })
    }

    /// Builds an id from explicit triplets.
    pub fn from_triplets(triplets: &[Triplet]) -> Result<Self> {
        let mut units = Vec::with_capacity(triplets.len() * TRIPLET_UNITS);
        for triplet in triplets {
            units.extend_from_slice(&encode_triplet(triplet)?);
        }
        Self::from_canonical(units)
    }

    /// Number of triplets.
    pub fn depth(&self) -> usize {
        triplet_count(&self.units)
    }

    pub fn triplet(&self, index: usize) -> Option<Triplet> {
        decode_triplet_at(&self.units, index)
    }

    pub fn triplets(&self) -> impl Iterator<Item = Triplet> + '_ {
        (0..self.depth()).filter_map(move |i| self.triplet(i))
    }
}

impl fmt::Display for TriplexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, &self.units)
    }
}

impl FromStr for TriplexId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self> {
        TriplexId::parse(s)
    }
}

impl Serialize for TriplexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TriplexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let stored = String::deserialize(deserializer)?;
        TriplexId::parse(&stored).map_err(D::Error::custom)
    }
}
