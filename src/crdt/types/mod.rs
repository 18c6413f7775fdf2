//! Type definitions for position identifiers.
//!
//! This module contains the fundamental types used throughout the codec,
//! organized into focused submodules.

pub mod clock;
pub mod duplex_id;
pub mod store;
pub mod triplet;
pub mod triplex_id;

pub use clock::{Version, VersionClock};
pub use duplex_id::DuplexId;
pub use store::StoreId;
pub use triplet::{MAX_PATH, MAX_UINT48, MAX_VERSION, Triplet, check_uint48};
pub use triplex_id::TriplexId;
