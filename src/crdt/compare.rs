//! Total-order comparison over identifier storage strings.

use std::cmp::Ordering;

use crate::crdt::surrogate::canonicalize;

/// Compares two identifier storage strings.
///
/// Both sides are canonicalized and compared code unit by code unit; a strict
/// prefix sorts first. Because of the triplet layout this is the same as
/// comparing triplet sequences pairwise by `(path, version, store)`.
///
/// Strings that are not a valid storage form sort after every valid one and
/// among themselves by raw UTF-16 code units, so the function stays total and
/// never reports `Equal` for a valid and an invalid string.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (canonicalize(a), canonicalize(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.encode_utf16().cmp(b.encode_utf16()),
    }
}
