//! Element definition for the positioned list.
//!
//! An element is the unit a replica ships to its peers: the position key,
//! the value, and a tombstone flag for logical deletion.

use serde::{Deserialize, Serialize};

use crate::crdt::types::TriplexId;

/// A single value held at a position in a [`PositionedList`](crate::PositionedList).
///
/// # Tombstone Deletion
///
/// Deleting marks the element instead of removing it, so a deleted position
/// keeps its key and concurrent inserts next to it still land where intended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element<T> {
    /// Position key; determines where the element sorts
    pub id: TriplexId,
    pub value: T,
    /// Whether this element has been logically deleted (tombstone)
    #[serde(default)]
    pub is_deleted: bool,
}

impl<T> Element<T> {
    /// Creates a live element
    pub fn new(id: TriplexId, value: T) -> Self {
        Element {
            id,
            value,
            is_deleted: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.is_deleted
    }

    pub fn delete(&mut self) {
        self.is_deleted = true;
    }
}

impl<T> PartialEq for Element<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Element<T> {}

impl<T> PartialOrd for Element<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Element<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
