//! Replicated list keyed by triplex ids.
//!
//! The list is the consumer the id codec exists for: every local insert asks
//! the generator for a key strictly between its neighbours, and the skip map's
//! key order is the document order on every replica.

use crossbeam_skiplist::SkipMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::ops::Bound;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::crdt::element::Element;
use crate::crdt::generator::IdGenerator;
use crate::crdt::types::{StoreId, TriplexId};
use crate::error::{IdError, Result};

/// A replicated sequence whose order is the order of its position keys.
///
/// # Design
///
/// - Position keys come from [`IdGenerator`], so concurrent inserts at the same
///   spot on different replicas never collide
/// - SkipMap for concurrent ordered access
/// - Tombstone-based deletion so deleted positions keep anchoring neighbours
pub struct PositionedList<T> {
    generator: IdGenerator,
    entries: Arc<SkipMap<TriplexId, Arc<RwLock<Element<T>>>>>,
}

impl<T: Clone + Send + Sync + 'static> PositionedList<T> {
    /// Creates an empty list minting keys with `generator`.
    pub fn new(generator: IdGenerator) -> Self {
        PositionedList {
            generator,
            entries: Arc::new(SkipMap::new()),
        }
    }

    pub fn store(&self) -> StoreId {
        self.generator.store()
    }

    pub fn generator(&self) -> &IdGenerator {
        &self.generator
    }

    /// Inserts `value` so that it becomes the visible element at `index`.
    ///
    /// # Returns
    ///
    /// * `Ok(TriplexId)` - The position key of the new element
    /// * `Err(IdError::IndexOutOfBounds)` - If `index` is past `len()`
    pub fn insert_at(&self, index: usize, value: T) -> Result<TriplexId> {
        let (lower, upper) = self.neighbours(index)?;
        let id = self.generator.triplex_id(lower.as_ref(), upper.as_ref())?;
        self.insert_local(Element::new(id.clone(), value));
        Ok(id)
    }

    /// Inserts `values` as one batch starting at visible position `index`.
    ///
    /// An empty batch still checks `index` but consumes no version.
    pub fn insert_many_at(&self, index: usize, values: Vec<T>) -> Result<Vec<TriplexId>> {
        let (lower, upper) = self.neighbours(index)?;
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self
            .generator
            .triplex_ids(values.len(), lower.as_ref(), upper.as_ref())?;
        for (id, value) in ids.iter().zip(values) {
            self.insert_local(Element::new(id.clone(), value));
        }
        Ok(ids)
    }

    /// Appends `value` after the last visible element.
    pub fn push(&self, value: T) -> Result<TriplexId> {
        self.insert_at(self.len(), value)
    }

    /// Logically deletes the element with the given key.
    pub fn delete(&self, id: &TriplexId) -> Result<()> {
        match self.entries.get(id) {
            Some(entry) => {
                entry.value().write().delete();
                Ok(())
            }
            None => Err(IdError::not_found(format!(
                "no element at depth-{} key in store {} list",
                id.depth(),
                self.store()
            ))),
        }
    }

    /// Logically deletes the visible element at `index`, returning its key.
    pub fn delete_at(&self, index: usize) -> Result<TriplexId> {
        let id = self
            .visible_ids()
            .nth(index)
            .ok_or_else(|| IdError::IndexOutOfBounds {
                index,
                len: self.len(),
            })?;
        self.delete(&id)?;
        Ok(id)
    }

    /// Integrates an element received from another replica.
    ///
    /// Unknown elements are inserted. For a known key only deletion travels:
    /// a tombstone is never revived, so applying the same set of elements in
    /// any order converges.
    pub fn apply_remote(&self, element: Element<T>) {
        self.generator.observe(&element.id);

        if let Some(entry) = self.entries.get(&element.id) {
            if element.is_deleted {
                entry.value().write().delete();
            }
            return;
        }

        debug!(
            store = self.store(),
            depth = element.id.depth(),
            deleted = element.is_deleted,
            "applying remote element"
        );
        self.entries
            .insert(element.id.clone(), Arc::new(RwLock::new(element)));
    }

    /// Parses a JSON element payload and applies it.
    pub fn apply_remote_json(&self, payload: &str) -> Result<()>
    where
        T: DeserializeOwned,
    {
        match serde_json::from_str::<Element<T>>(payload) {
            Ok(element) => {
                self.apply_remote(element);
                Ok(())
            }
            Err(e) => {
                warn!(store = self.store(), error = %e, "rejected remote element payload");
                Err(e.into())
            }
        }
    }

    /// Gets the visible value at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let element = entry.value().read();
                element.is_visible().then(|| element.value.clone())
            })
            .nth(index)
    }

    /// Returns the visible values in document order.
    pub fn values(&self) -> Vec<T> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let element = entry.value().read();
                element.is_visible().then(|| element.value.clone())
            })
            .collect()
    }

    /// Returns all elements, tombstones included, for replication.
    pub fn elements(&self) -> Vec<Element<T>> {
        self.entries
            .iter()
            .map(|entry| entry.value().read().clone())
            .collect()
    }

    /// Returns the keys of the visible elements in document order.
    pub fn ids(&self) -> Vec<TriplexId> {
        self.visible_ids().collect()
    }

    /// Number of visible elements.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().read().is_visible())
            .count()
    }

    /// Number of elements including tombstones.
    pub fn total_len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn visible_ids(&self) -> impl Iterator<Item = TriplexId> + '_ {
        self.entries.iter().filter_map(|entry| {
            entry
                .value()
                .read()
                .is_visible()
                .then(|| entry.key().clone())
        })
    }

    /// Keys bracketing visible position `index`.
    ///
    /// The lower key is the visible element before `index`. The upper key is
    /// whatever entry directly follows it in the map, tombstones included, so
    /// the new key lands immediately after the lower neighbour.
    fn neighbours(&self, index: usize) -> Result<(Option<TriplexId>, Option<TriplexId>)> {
        let len = self.len();
        if index > len {
            return Err(IdError::IndexOutOfBounds { index, len });
        }

        let lower = match index {
            0 => None,
            _ => self.visible_ids().nth(index - 1),
        };
        let upper = match &lower {
            Some(lower) => self.entries.lower_bound(Bound::Excluded(lower)),
            None => self.entries.front(),
        }
        .map(|entry| entry.key().clone());

        Ok((lower, upper))
    }

    fn insert_local(&self, element: Element<T>) {
        self.entries
            .insert(element.id.clone(), Arc::new(RwLock::new(element)));
    }
}
