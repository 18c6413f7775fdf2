//! Duplex id generation.

use crate::crdt::types::{DuplexId, StoreId, Version};
use crate::error::Result;

/// Creates the storage string of a `(version, store)` duplex id.
///
/// Pure: equal inputs give equal strings, distinct inputs give distinct
/// strings. Fails only when `version` does not fit in 48 bits.
pub fn create_duplex_id(version: Version, store: StoreId) -> Result<String> {
    Ok(DuplexId::new(version, store)?.to_string())
}
