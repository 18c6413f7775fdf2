//! Fixed-width triplet codec.
//!
//! A triplet occupies exactly eight 16-bit code units: three for `path`, three
//! for `version` and two for `store`, each field most-significant limb first.
//! That layout is what makes code-unit-wise comparison of the encoded form
//! agree with numeric comparison of the triplets.
//!
//! Decoding works on canonical runs only, i.e. after
//! [`strip_surrogates`](crate::crdt::surrogate::strip_surrogates). The escaped
//! storage form has a different length and would shift every offset.

use crate::crdt::types::{StoreId, Triplet, Version, check_uint48};
use crate::error::Result;

/// Code units per encoded triplet.
pub const TRIPLET_UNITS: usize = 8;

/// Code units per encoded duplex id.
pub const DUPLEX_UNITS: usize = 5;

/// Appends the three 16-bit limbs of a 48-bit value.
fn push_uint48(out: &mut Vec<u16>, value: u64) {
    out.push((value >> 32) as u16);
    out.push((value >> 16) as u16);
    out.push(value as u16);
}

/// Appends the two 16-bit limbs of a 32-bit value.
fn push_uint32(out: &mut Vec<u16>, value: u32) {
    out.push((value >> 16) as u16);
    out.push(value as u16);
}

/// Recombines three limbs as `a * 2^32 + b * 2^16 + c`.
fn read_uint48([a, b, c]: [u16; 3]) -> u64 {
    (u64::from(a) << 32) | (u64::from(b) << 16) | u64::from(c)
}

/// Recombines two limbs as `a * 2^16 + b`.
fn read_uint32([a, b]: [u16; 2]) -> u32 {
    (u32::from(a) << 16) | u32::from(b)
}

/// Encodes a triplet into its raw eight-unit form.
///
/// Fails with [`IdError::OutOfRange`](crate::IdError::OutOfRange) when `path`
/// or `version` does not fit in 48 bits, instead of dropping the high bits.
pub fn encode_triplet(triplet: &Triplet) -> Result<[u16; TRIPLET_UNITS]> {
    check_uint48("path", triplet.path)?;
    check_uint48("version", triplet.version)?;

    let mut units = Vec::with_capacity(TRIPLET_UNITS);
    push_uint48(&mut units, triplet.path);
    push_uint48(&mut units, triplet.version);
    push_uint32(&mut units, triplet.store);

    let mut out = [0u16; TRIPLET_UNITS];
    out.copy_from_slice(&units);
    Ok(out)
}

/// Encodes a `(version, store)` pair into its raw five-unit form.
pub fn encode_duplex(version: Version, store: StoreId) -> Result<[u16; DUPLEX_UNITS]> {
    check_uint48("version", version)?;

    let mut units = Vec::with_capacity(DUPLEX_UNITS);
    push_uint48(&mut units, version);
    push_uint32(&mut units, store);

    let mut out = [0u16; DUPLEX_UNITS];
    out.copy_from_slice(&units);
    Ok(out)
}

/// Splits a raw five-unit duplex run back into `(version, store)`.
pub fn decode_duplex(units: &[u16; DUPLEX_UNITS]) -> (Version, StoreId) {
    let [v0, v1, v2, s0, s1] = *units;
    (read_uint48([v0, v1, v2]), read_uint32([s0, s1]))
}

/// Number of whole triplets in a canonical run.
pub fn triplet_count(canonical: &[u16]) -> usize {
    canonical.len() / TRIPLET_UNITS
}

/// Decodes the triplet at zero-based `index`, or `None` past the end.
pub fn decode_triplet_at(canonical: &[u16], index: usize) -> Option<Triplet> {
    let start = index.checked_mul(TRIPLET_UNITS)?;
    let end = start.checked_add(TRIPLET_UNITS)?;
    let &[p0, p1, p2, v0, v1, v2, s0, s1] = canonical.get(start..end)? else {
        return None;
    };
    Some(Triplet {
        path: read_uint48([p0, p1, p2]),
        version: read_uint48([v0, v1, v2]),
        store: read_uint32([s0, s1]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crdt::types::{MAX_PATH, MAX_VERSION};
    use crate::error::IdError;

    #[test]
    fn test_limb_layout() {
        let triplet = Triplet::new(0x1234_5678_9ABC, 0x0000_0001_0002, 0xDEAD_BEEF).unwrap();
        assert_eq!(
            encode_triplet(&triplet).unwrap(),
            [0x1234, 0x5678, 0x9ABC, 0x0000, 0x0001, 0x0002, 0xDEAD, 0xBEEF]
        );
    }

    #[test]
    fn test_decode_triplet_at() {
        let first = Triplet::new(MAX_PATH, MAX_VERSION, u32::MAX).unwrap();
        let second = Triplet::new(7, 3, 1).unwrap();

        let mut canonical = encode_triplet(&first).unwrap().to_vec();
        canonical.extend_from_slice(&encode_triplet(&second).unwrap());

        assert_eq!(triplet_count(&canonical), 2);
        assert_eq!(decode_triplet_at(&canonical, 0), Some(first));
        assert_eq!(decode_triplet_at(&canonical, 1), Some(second));
        assert_eq!(decode_triplet_at(&canonical, 2), None);
    }

    #[test]
    fn test_partial_triplet_is_ignored() {
        let mut canonical = encode_triplet(&Triplet::new(1, 1, 1).unwrap()).unwrap().to_vec();
        canonical.extend_from_slice(&[1, 2, 3]);

        assert_eq!(triplet_count(&canonical), 1);
        assert_eq!(decode_triplet_at(&canonical, 1), None);
    }

    #[test]
    fn test_encoded_order_matches_numeric_order() {
        let pairs = [
            (Triplet::new(1, 0, 0).unwrap(), Triplet::new(0x1_0000, 0, 0).unwrap()),
            (Triplet::new(5, 0xFFFF, 0).unwrap(), Triplet::new(5, 0x1_0000, 0).unwrap()),
            (Triplet::new(5, 5, 0xFFFF).unwrap(), Triplet::new(5, 5, 0x1_0000).unwrap()),
        ];
        for (a, b) in pairs {
            assert!(a < b);
            assert!(encode_triplet(&a).unwrap() < encode_triplet(&b).unwrap());
        }
    }

    #[test]
    fn test_encode_duplex() {
        let units = encode_duplex(0x0001_0002_0003, 0x0004_0005).unwrap();
        assert_eq!(units, [1, 2, 3, 4, 5]);
        assert_eq!(decode_duplex(&units), (0x0001_0002_0003, 0x0004_0005));
    }

    #[test]
    fn test_wide_fields_are_rejected_not_masked() {
        // 2^48 + 5 would otherwise encode exactly like path 5
        let wide = Triplet {
            path: (1 << 48) + 5,
            version: 0,
            store: 0,
        };
        let err = encode_triplet(&wide).unwrap_err();
        assert!(matches!(
            err,
            IdError::OutOfRange {
                field: "path",
                value: 281_474_976_710_661,
                ..
            }
        ));

        let wide_version = Triplet {
            path: 5,
            version: MAX_VERSION + 1,
            store: 0,
        };
        assert!(matches!(
            encode_triplet(&wide_version),
            Err(IdError::OutOfRange { field: "version", .. })
        ));
        assert!(encode_duplex(MAX_VERSION + 1, 0).is_err());
    }

    #[test]
    fn test_decode_at_huge_index() {
        let canonical = encode_triplet(&Triplet::new(1, 1, 1).unwrap()).unwrap();
        assert_eq!(decode_triplet_at(&canonical, usize::MAX / TRIPLET_UNITS), None);
        assert_eq!(decode_triplet_at(&canonical, usize::MAX), None);
    }
}
