//! Linear-scan spatial index driving query and distance relays.
//!
//! Stands in for the engine's tree index: results reach the host through the
//! relays, on the calling thread, in insertion order.

use crate::bounds::BoundingBox;
use crate::relay::{DistanceRelay, QueryRelay};

/// Items with their envelopes.
#[derive(Debug)]
pub struct MemoryIndex<I> {
    items: Vec<(BoundingBox, I)>,
}

impl<I> Default for MemoryIndex<I> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<I> MemoryIndex<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, envelope: BoundingBox, item: I) {
        self.items.push((envelope, item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Relay every item whose envelope intersects `envelope`.
    pub fn query<T>(&self, envelope: &BoundingBox, relay: &QueryRelay<I, T>) {
        for (env, item) in &self.items {
            if env.intersects(envelope) {
                relay.on_match(item);
            }
        }
    }

    /// Relay every item, matching or not.
    pub fn iterate<T>(&self, relay: &QueryRelay<I, T>) {
        for (_, item) in &self.items {
            relay.on_match(item);
        }
    }

    /// Item minimizing the relayed distance to `target`.
    ///
    /// A relay returning `false` aborts the search with `None`. Ties keep the
    /// earliest item.
    pub fn nearest<T>(&self, target: &I, relay: &DistanceRelay<I, T>) -> Option<&I> {
        let mut best: Option<(f64, &I)> = None;
        for (_, item) in &self.items {
            let mut d = f64::INFINITY;
            if !relay.distance(item, target, &mut d) {
                return None;
            }
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, item));
            }
        }
        best.map(|(_, item)| item)
    }
}

impl<I: PartialEq> MemoryIndex<I> {
    /// Remove the first entry equal to `item` whose envelope equals `envelope`.
    ///
    /// Returns whether an entry was removed; the order of the rest is kept.
    pub fn remove(&mut self, envelope: &BoundingBox, item: &I) -> bool {
        match self
            .items
            .iter()
            .position(|(env, it)| env == envelope && it == item)
        {
            Some(at) => {
                self.items.remove(at);
                true
            }
            None => false,
        }
    }
}
