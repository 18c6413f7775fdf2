//! Triplex id generation: minting a position key strictly between two others.
//!
//! The walk compares the bounds one triplet at a time. While both agree the
//! shared triplet is copied. At the first divergence a fresh path is drawn
//! from the gap when one exists; when the paths are adjacent the lower
//! triplet is copied and the walk continues one level deeper with the upper
//! bound treated as open. The id space therefore never runs out: depth grows
//! instead.

use rand::Rng;
use tracing::trace;

use crate::crdt::types::{MAX_PATH, StoreId, Triplet, TriplexId, Version, check_uint48};
use crate::error::{IdError, Result};

/// Path of the upper sentinel used while the upper side is open.
const OPEN_UPPER_PATH: u64 = MAX_PATH + 1;

/// Creates the storage string of a new id strictly between `lower` and `upper`.
///
/// An empty string means "no bound" on that side. Both bounds must be storage
/// strings produced by this crate, and when both are present `lower` must sort
/// before `upper`.
pub fn create_triplex_id<R: Rng + ?Sized>(
    rng: &mut R,
    version: Version,
    store: StoreId,
    lower: &str,
    upper: &str,
) -> Result<String> {
    let lower = parse_bound(lower)?;
    let upper = parse_bound(upper)?;
    let id = generate_between(rng, version, store, lower.as_ref(), upper.as_ref())?;
    Ok(id.to_string())
}

/// Creates `n` strictly increasing storage strings between `lower` and `upper`.
pub fn create_triplex_ids<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    version: Version,
    store: StoreId,
    lower: &str,
    upper: &str,
) -> Result<Vec<String>> {
    let lower = parse_bound(lower)?;
    let upper = parse_bound(upper)?;
    let ids = generate_many(rng, n, version, store, lower.as_ref(), upper.as_ref())?;
    Ok(ids.iter().map(TriplexId::to_string).collect())
}

/// Parses a bound where the empty string stands for "unbounded".
pub fn parse_bound(stored: &str) -> Result<Option<TriplexId>> {
    if stored.is_empty() {
        return Ok(None);
    }
    TriplexId::parse(stored).map(Some)
}

/// Mints a new id strictly between `lower` and `upper`.
///
/// # Errors
///
/// * [`IdError::OutOfRange`] if `version` does not fit in 48 bits
/// * [`IdError::InvalidBounds`] if both bounds are given and `lower >= upper`
pub fn generate_between<R: Rng + ?Sized>(
    rng: &mut R,
    version: Version,
    store: StoreId,
    lower: Option<&TriplexId>,
    upper: Option<&TriplexId>,
) -> Result<TriplexId> {
    check_uint48("version", version)?;
    if let (Some(lower), Some(upper)) = (lower, upper) {
        if lower >= upper {
            return Err(IdError::InvalidBounds);
        }
    }

    let lower_count = lower.map_or(0, TriplexId::depth);
    let upper_count = upper.map_or(0, TriplexId::depth);
    let depth = lower_count.max(upper_count);

    // Open only when no upper bound was supplied at all; once the walk has
    // committed to the lower bound's branch it is forced open as well.
    let mut upper_open = upper_count == 0;
    let mut triplets = Vec::with_capacity(depth + 1);

    for index in 0..depth {
        let lo = lower_at(lower, index);
        let hi = upper_at(upper, index, upper_open);

        if lo == hi {
            triplets.push(lo);
            continue;
        }

        if hi.path > lo.path + 1 {
            let path = pick_path(rng, lo.path, hi.path);
            triplets.push(Triplet {
                path,
                version,
                store,
            });
            return TriplexId::from_triplets(&triplets);
        }

        trace!(depth = index, path = lo.path, "no free path, descending along lower bound");
        triplets.push(lo);
        upper_open = true;
    }

    triplets.push(Triplet {
        path: rng.gen_range(1..=MAX_PATH),
        version,
        store,
    });
    TriplexId::from_triplets(&triplets)
}

/// Mints `n` ids by feeding each new id back in as the lower bound.
pub fn generate_many<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    version: Version,
    store: StoreId,
    lower: Option<&TriplexId>,
    upper: Option<&TriplexId>,
) -> Result<Vec<TriplexId>> {
    let mut ids: Vec<TriplexId> = Vec::with_capacity(n);
    for _ in 0..n {
        let previous = ids.last().or(lower);
        let id = generate_between(rng, version, store, previous, upper)?;
        ids.push(id);
    }
    Ok(ids)
}

fn lower_at(lower: Option<&TriplexId>, index: usize) -> Triplet {
    lower
        .and_then(|id| id.triplet(index))
        .unwrap_or(Triplet::ZERO)
}

/// Upper triplet at `index`.
///
/// Past the end of a supplied upper bound this is the zero triplet: a shorter
/// id sorts before all of its extensions. Only an open upper side yields the
/// `MAX_PATH + 1` sentinel.
fn upper_at(upper: Option<&TriplexId>, index: usize, open: bool) -> Triplet {
    if open {
        return Triplet {
            path: OPEN_UPPER_PATH,
            version: 0,
            store: 0,
        };
    }
    upper
        .and_then(|id| id.triplet(index))
        .unwrap_or(Triplet::ZERO)
}

/// Draws a path in `lower + 1 ..= upper - 1`, biased low.
///
/// The candidate window is the square root of the free range, so repeated
/// inserts at one boundary spread over a window that shrinks gradually
/// instead of piling onto one edge.
fn pick_path<R: Rng + ?Sized>(rng: &mut R, lower: u64, upper: u64) -> u64 {
    let gap = upper - lower;
    let window = ((gap - 1) as f64).sqrt();
    let offset = (rng.gen_range(0.0f64..1.0) * window).round() as u64;
    lower + 1 + offset.min(gap - 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crdt::compare::compare;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cmp::Ordering;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn id(triplets: &[(u64, u64, u32)]) -> TriplexId {
        let triplets: Vec<Triplet> = triplets
            .iter()
            .map(|&(p, v, s)| Triplet::new(p, v, s).unwrap())
            .collect();
        TriplexId::from_triplets(&triplets).unwrap()
    }

    #[test]
    fn test_unbounded_generation() {
        let mut rng = rng();
        let x = generate_between(&mut rng, 1, 1, None, None).unwrap();
        assert_eq!(x.depth(), 1);

        let t = x.triplet(0).unwrap();
        assert!(t.path >= 1 && t.path <= MAX_PATH);
        assert_eq!((t.version, t.store), (1, 1));
    }

    #[test]
    fn test_prepend_append_scenario() {
        let mut rng = rng();
        let x = create_triplex_id(&mut rng, 1, 1, "", "").unwrap();
        let y = create_triplex_id(&mut rng, 2, 2, "", &x).unwrap();
        assert_eq!(compare(&y, &x), Ordering::Less);

        let z = create_triplex_id(&mut rng, 3, 3, &y, &x).unwrap();
        assert_eq!(compare(&y, &z), Ordering::Less);
        assert_eq!(compare(&z, &x), Ordering::Less);
    }

    #[test]
    fn test_open_upper_sentinel_only_without_upper_bound() {
        let short = id(&[(10, 1, 1)]);

        // No upper bound at all: the sentinel sits past the largest path.
        assert_eq!(upper_at(None, 0, true).path, MAX_PATH + 1);
        // A supplied upper bound that has run out reads as the zero triplet.
        assert_eq!(upper_at(Some(&short), 1, false), Triplet::ZERO);
        assert_eq!(upper_at(Some(&short), 0, false), short.triplet(0).unwrap());
        // Once forced open the supplied bound is ignored.
        assert_eq!(upper_at(Some(&short), 0, true).path, MAX_PATH + 1);
    }

    #[test]
    fn test_lower_at_max_path_descends() {
        let mut rng = rng();
        let lower = id(&[(MAX_PATH, 4, 4)]);
        let z = generate_between(&mut rng, 5, 5, Some(&lower), None).unwrap();

        assert_eq!(z.depth(), 2);
        assert_eq!(z.triplet(0), lower.triplet(0));
        assert!(z > lower);
    }

    #[test]
    fn test_adjacent_paths_descend_along_lower() {
        let mut rng = rng();
        let lower = id(&[(5, 1, 1)]);
        let upper = id(&[(6, 1, 1)]);
        let z = generate_between(&mut rng, 2, 2, Some(&lower), Some(&upper)).unwrap();

        assert_eq!(z.depth(), 2);
        assert_eq!(z.triplet(0), lower.triplet(0));
        assert!(lower < z && z < upper);
    }

    #[test]
    fn test_equal_paths_different_store() {
        let mut rng = rng();
        let lower = id(&[(5, 1, 1)]);
        let upper = id(&[(5, 1, 2)]);
        let z = generate_between(&mut rng, 2, 9, Some(&lower), Some(&upper)).unwrap();
        assert!(lower < z && z < upper);
    }

    #[test]
    fn test_shared_prefix_is_copied() {
        let mut rng = rng();
        let lower = id(&[(100, 1, 1), (5, 1, 1)]);
        let upper = id(&[(100, 1, 1), (500, 2, 2)]);
        let z = generate_between(&mut rng, 3, 3, Some(&lower), Some(&upper)).unwrap();

        assert_eq!(z.depth(), 2);
        assert_eq!(z.triplet(0), lower.triplet(0));
        assert!(lower < z && z < upper);
    }

    #[test]
    fn test_pick_path_stays_inside_gap() {
        let mut rng = rng();
        for _ in 0..1000 {
            assert_eq!(pick_path(&mut rng, 4, 6), 5);
            let p = pick_path(&mut rng, 4, 7);
            assert!(p == 5 || p == 6);
            assert!(pick_path(&mut rng, MAX_PATH - 2, MAX_PATH + 1) <= MAX_PATH);
        }
    }

    #[test]
    fn test_pick_path_is_biased_low() {
        let mut rng = rng();
        for _ in 0..1000 {
            let p = pick_path(&mut rng, 0, 10_001);
            assert!((1..=101).contains(&p));
        }
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut rng = rng();
        let a = id(&[(5, 1, 1)]);
        let b = id(&[(9, 1, 1)]);
        assert!(matches!(
            generate_between(&mut rng, 1, 1, Some(&b), Some(&a)),
            Err(IdError::InvalidBounds)
        ));
        assert!(matches!(
            generate_between(&mut rng, 1, 1, Some(&a), Some(&a)),
            Err(IdError::InvalidBounds)
        ));
        assert!(create_triplex_id(&mut rng, 1, 1, "not an id", "").is_err());
        assert!(generate_between(&mut rng, MAX_PATH + 1, 1, None, None).is_err());
    }

    #[test]
    fn test_same_seed_same_ids() {
        let a = create_triplex_ids(&mut rng(), 20, 1, 1, "", "").unwrap();
        let b = create_triplex_ids(&mut rng(), 20, 1, 1, "", "").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_is_increasing() {
        let mut rng = rng();
        let lower = create_triplex_id(&mut rng, 1, 1, "", "").unwrap();
        let upper = create_triplex_id(&mut rng, 2, 1, &lower, "").unwrap();

        let ids = create_triplex_ids(&mut rng, 50, 3, 1, &lower, &upper).unwrap();
        assert_eq!(ids.len(), 50);
        assert_eq!(compare(&lower, &ids[0]), Ordering::Less);
        for pair in ids.windows(2) {
            assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less);
        }
        assert_eq!(compare(&ids[49], &upper), Ordering::Less);
    }

    #[test]
    fn test_empty_batch() {
        assert!(create_triplex_ids(&mut rng(), 0, 1, 1, "", "").unwrap().is_empty());
    }
}
