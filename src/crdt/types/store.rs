//! Store identifier type.
//!
//! A store is one replica of the surrounding datastore. Every triplet records
//! the store that minted it, which is the final tie-breaker between ids that
//! otherwise agree on path and version.

/// A unique identifier for each replica ("store") in the distributed system.
///
/// Store ids are 32 bits wide on the wire, so the type makes the bit budget
/// part of the contract instead of masking wider values.
pub type StoreId = u32;
