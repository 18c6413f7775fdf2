//! The `(path, version, store)` triplet, the unit identifiers are built from.

use crate::crdt::types::clock::Version;
use crate::crdt::types::store::StoreId;
use crate::error::{IdError, Result};

/// Largest value a 48-bit field can hold.
pub const MAX_UINT48: u64 = (1 << 48) - 1;

/// Largest usable path value.
pub const MAX_PATH: u64 = MAX_UINT48;

/// Largest usable version value.
pub const MAX_VERSION: Version = MAX_UINT48;

/// One level of a triplex identifier.
///
/// # Ordering
///
/// Triplets order by `path`, then `version`, then `store`, each as an unsigned
/// integer. The derived `Ord` relies on the field declaration order below, and
/// matches the code-unit order of the encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triplet {
    /// Ordering-bearing value chosen between two neighbours at the same depth
    pub path: u64,
    /// Logical clock of the minting store at creation time
    pub version: Version,
    /// The store that minted this triplet
    pub store: StoreId,
}

impl Triplet {
    /// The all-zero triplet, used as the lower sentinel past a bound's depth.
    pub const ZERO: Triplet = Triplet {
        path: 0,
        version: 0,
        store: 0,
    };

    /// Creates a triplet, rejecting fields that exceed 48 bits.
    pub fn new(path: u64, version: Version, store: StoreId) -> Result<Self> {
        check_uint48("path", path)?;
        check_uint48("version", version)?;
        Ok(Triplet {
            path,
            version,
            store,
        })
    }
}

/// Fails with [`IdError::OutOfRange`] when `value` does not fit in 48 bits.
pub fn check_uint48(field: &'static str, value: u64) -> Result<()> {
    if value > MAX_UINT48 {
        return Err(IdError::OutOfRange {
            field,
            value,
            max: MAX_UINT48,
        });
    }
    Ok(())
}
