//! Order-preserving, conflict-free identifiers for replicated sequences.
//!
//! Leaves first: the triplet codec, surrogate canonicalization, the
//! comparator, then the duplex and triplex generators. The generator and the
//! positioned list sit on top as the per-replica entry points.

pub mod codec;
pub mod compare;
pub mod duplex;
pub mod element;
pub mod generator;
pub mod list;
pub mod surrogate;
pub mod triplex;
pub mod types;

// Re-export the main public API
pub use compare::compare;
pub use duplex::create_duplex_id;
pub use element::Element;
pub use generator::IdGenerator;
pub use list::PositionedList;
pub use triplex::{create_triplex_id, create_triplex_ids, generate_between, generate_many};
pub use types::{
    DuplexId, MAX_PATH, MAX_VERSION, StoreId, Triplet, TriplexId, Version, VersionClock,
};
