//! # crdt-position - Order-preserving position identifiers
//!
//! Dense, totally ordered position keys for elements of a replicated sequence
//! (characters of collaborative text, items of a list). Any replica can mint a
//! key strictly between two existing keys without coordinating with the
//! others, in the style of Logoot/LSEQ fractional indexing.
//!
//! ## Features
//!
//! - **Always room**: when no integer path fits between two keys the new key
//!   grows one level deeper instead of failing
//! - **Conflict-free**: every level records the minting store's version and id,
//!   so keys minted concurrently for the same gap stay distinct and ordered
//! - **Unicode-safe storage form**: keys serialize to valid strings that survive
//!   JSON and other text transports, and canonicalize back losslessly
//!
//! ## Example
//!
//! ```rust
//! use crdt_position::{compare, create_triplex_id};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use std::cmp::Ordering;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let x = create_triplex_id(&mut rng, 1, 1, "", "").unwrap();
//! let y = create_triplex_id(&mut rng, 2, 2, "", &x).unwrap();
//! assert_eq!(compare(&y, &x), Ordering::Less);
//! ```

pub mod config;
pub mod crdt;
pub mod error;

// Re-export the main public API from the CRDT module
pub use config::GeneratorConfig;
pub use crdt::{DuplexId, MAX_PATH, MAX_VERSION, StoreId, Triplet, TriplexId, Version};
pub use crdt::{Element, IdGenerator, PositionedList, VersionClock};
pub use crdt::{
    compare, create_duplex_id, create_triplex_id, create_triplex_ids, generate_between,
    generate_many,
};
pub use error::{IdError, Result};
