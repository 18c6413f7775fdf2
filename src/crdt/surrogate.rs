//! Surrogate canonicalization.
//!
//! Raw limbs can take any value in `0..=0xFFFF`, including the UTF-16
//! surrogate ranges, so a raw run is not necessarily valid text. [`escape`]
//! rewrites it into well-formed UTF-16 and [`strip_surrogates`] undoes that
//! exactly. Canonical runs are what the codec and the comparator work on.
//!
//! Escaping rewrites single code units:
//!
//! | raw unit          | escaped                          |
//! |-------------------|----------------------------------|
//! | low surrogate `l` | `MARKER, HIGH_SENTINEL, l`       |
//! | `MARKER`          | `MARKER, MARKER`                 |
//! | high surrogate `h`| `h, LOW_SENTINEL, MARKER`        |
//! | anything else     | unchanged                        |
//!
//! The marker is doubled because `MARKER, HIGH_SENTINEL` followed by a raw low
//! sentinel would otherwise escape to the same run as a raw low sentinel.

use std::fmt;

use crate::error::{IdError, Result};

/// Synthetic high surrogate paired with an escaped low surrogate.
pub const HIGH_SENTINEL: u16 = 0xDBFF;

/// Synthetic low surrogate paired with an escaped high surrogate.
pub const LOW_SENTINEL: u16 = 0xDC00;

/// Ordinary (private use) character framing both synthesized pairs.
pub const MARKER: u16 = 0xE000;

/// True for `0xD800..=0xDBFF`.
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// True for `0xDC00..=0xDFFF`.
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Escapes a raw code-unit run into well-formed UTF-16.
pub fn escape(raw: &[u16]) -> Vec<u16> {
    // Pass 1: give every low surrogate a synthetic high partner.
    let mut paired = Vec::with_capacity(raw.len() + raw.len() / 4);
    for &unit in raw {
        if is_low_surrogate(unit) {
            paired.extend_from_slice(&[MARKER, HIGH_SENTINEL, unit]);
        } else if unit == MARKER {
            paired.extend_from_slice(&[MARKER, MARKER]);
        } else {
            paired.push(unit);
        }
    }

    // Pass 2: give every still-unpaired high surrogate a synthetic low partner.
    let mut escaped = Vec::with_capacity(paired.len() + paired.len() / 4);
    for (i, &unit) in paired.iter().enumerate() {
        escaped.push(unit);
        let followed_by_low = paired.get(i + 1).is_some_and(|&next| is_low_surrogate(next));
        if is_high_surrogate(unit) && !followed_by_low {
            escaped.extend_from_slice(&[LOW_SENTINEL, MARKER]);
        }
    }
    escaped
}

/// Reverses [`escape`], failing on runs it could not have produced.
pub fn strip_surrogates(escaped: &[u16]) -> Result<Vec<u16>> {
    let mut raw = Vec::with_capacity(escaped.len());
    let mut i = 0;
    while i < escaped.len() {
        let unit = escaped[i];
        if unit == MARKER {
            match (escaped.get(i + 1), escaped.get(i + 2)) {
                (Some(&MARKER), _) => {
                    raw.push(MARKER);
                    i += 2;
                }
                (Some(&HIGH_SENTINEL), Some(&low)) if is_low_surrogate(low) => {
                    raw.push(low);
                    i += 3;
                }
                _ => return Err(IdError::invalid(format!("dangling marker at unit {i}"))),
            }
        } else if is_high_surrogate(unit) {
            match (escaped.get(i + 1), escaped.get(i + 2)) {
                (Some(&LOW_SENTINEL), Some(&MARKER)) => {
                    raw.push(unit);
                    i += 3;
                }
                _ => {
                    return Err(IdError::invalid(format!(
                        "unescaped high surrogate at unit {i}"
                    )));
                }
            }
        } else if is_low_surrogate(unit) {
            return Err(IdError::invalid(format!("unescaped low surrogate at unit {i}")));
        } else {
            raw.push(unit);
            i += 1;
        }
    }
    Ok(raw)
}

/// Writes the escaped form of a raw run to a formatter.
pub fn write_escaped(f: &mut fmt::Formatter<'_>, raw: &[u16]) -> fmt::Result {
    for c in char::decode_utf16(escape(raw)) {
        fmt::Write::write_char(f, c.map_err(|_| fmt::Error)?)?;
    }
    Ok(())
}

/// Canonicalizes a storage string back into its raw code units.
pub fn canonicalize(stored: &str) -> Result<Vec<u16>> {
    let escaped: Vec<u16> = stored.encode_utf16().collect();
    strip_surrogates(&escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_units_pass_through() {
        let raw = [0x0000, 0x0041, 0xD7FF, 0xE001, 0xFFFF];
        assert_eq!(escape(&raw), raw.to_vec());
        assert_eq!(strip_surrogates(&raw).unwrap(), raw.to_vec());
    }

    #[test]
    fn test_low_surrogate_escape() {
        assert_eq!(escape(&[0xDC05]), vec![MARKER, HIGH_SENTINEL, 0xDC05]);
    }

    #[test]
    fn test_high_surrogate_escape() {
        assert_eq!(escape(&[0xD805]), vec![0xD805, LOW_SENTINEL, MARKER]);
    }

    #[test]
    fn test_raw_high_before_low_is_still_escaped() {
        // A raw high followed by a raw low is not treated as a genuine pair.
        let raw = [0xD800, 0xDC00];
        let escaped = escape(&raw);
        assert_eq!(
            escaped,
            vec![0xD800, LOW_SENTINEL, MARKER, MARKER, HIGH_SENTINEL, 0xDC00]
        );
        assert_eq!(strip_surrogates(&escaped).unwrap(), raw.to_vec());
    }

    #[test]
    fn test_marker_is_doubled() {
        assert_eq!(escape(&[MARKER]), vec![MARKER, MARKER]);
    }

    #[test]
    fn test_sentinel_collision_round_trips() {
        // Without marker doubling these two runs would escape identically.
        let a = [MARKER, HIGH_SENTINEL];
        let b = [LOW_SENTINEL, MARKER];
        assert_ne!(escape(&a), escape(&b));
        assert_eq!(strip_surrogates(&escape(&a)).unwrap(), a.to_vec());
        assert_eq!(strip_surrogates(&escape(&b)).unwrap(), b.to_vec());
    }

    #[test]
    fn test_every_single_unit_round_trips() {
        for unit in 0..=u16::MAX {
            let escaped = escape(&[unit]);
            assert!(String::from_utf16(&escaped).is_ok(), "unit {unit:#06x}");
            assert_eq!(strip_surrogates(&escaped).unwrap(), vec![unit]);
        }
    }

    #[test]
    fn test_sentinel_pairs_round_trip() {
        let interesting = [
            0x0000,
            0xD7FF,
            0xD800,
            HIGH_SENTINEL,
            LOW_SENTINEL,
            0xDFFF,
            MARKER,
            0xFFFF,
        ];
        for &a in &interesting {
            for &b in &interesting {
                for &c in &interesting {
                    let raw = [a, b, c];
                    let escaped = escape(&raw);
                    assert!(String::from_utf16(&escaped).is_ok());
                    assert_eq!(strip_surrogates(&escaped).unwrap(), raw.to_vec());
                }
            }
        }
    }

    #[test]
    fn test_malformed_runs_are_rejected() {
        assert!(strip_surrogates(&[MARKER]).is_err());
        assert!(strip_surrogates(&[MARKER, 0x0041]).is_err());
        assert!(strip_surrogates(&[MARKER, HIGH_SENTINEL]).is_err());
        assert!(strip_surrogates(&[0xD800, LOW_SENTINEL]).is_err());
        assert!(strip_surrogates(&[0xDC00]).is_err());
    }

    #[test]
    fn test_storage_string_round_trip() {
        let raw = [0xD800, 0x0000, 0xDFFF, MARKER, 0x1234];
        let stored = String::from_utf16(&escape(&raw)).unwrap();
        assert_eq!(canonicalize(&stored).unwrap(), raw.to_vec());
    }
}
