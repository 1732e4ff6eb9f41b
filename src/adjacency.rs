//! # Adjacency Store
//!
//! Records, for every track and every shuffle it appears in, the track
//! immediately before and after it. Everything else in the crate (mining,
//! reconstruction) is a walk over these links.
//!
//! ## Storage Model
//!
//! ```text
//! track "D" ─┬─ shuffle 0: prev "A", next "E"
//!            ├─ shuffle 1: prev "A", next "E"
//!            └─ shuffle 3: prev None, next "B"   (first in shuffle 3)
//! ```
//!
//! A missing shuffle key means the track is not in that shuffle. `None` on
//! either side marks the start or end of the shuffle. A track repeated
//! inside one shuffle keeps only the links of its last occurrence.

use crate::error::{IndexError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

/// Identifier of one linked shuffle. Assigned in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShuffleId(pub u64);

impl ShuffleId {
    /// `None` once the ID space is used up.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for ShuffleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which way to walk along a shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the start of the shuffle (`prev` links).
    Backward,
    /// Towards the end of the shuffle (`next` links).
    Forward,
}

/// Neighbors of one track inside one shuffle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<I> {
    pub prev: Option<I>,
    pub next: Option<I>,
}

impl<I> Link<I> {
    #[must_use]
    pub fn toward(&self, direction: Direction) -> Option<&I> {
        match direction {
            Direction::Backward => self.prev.as_ref(),
            Direction::Forward => self.next.as_ref(),
        }
    }
}

/// All links of a single track, keyed by shuffle.
#[derive(Debug, Clone)]
pub struct AdjacencyRecord<I> {
    links: BTreeMap<ShuffleId, Link<I>>,
}

impl<I> Default for AdjacencyRecord<I> {
    fn default() -> Self {
        Self { links: BTreeMap::new() }
    }
}

impl<I> AdjacencyRecord<I> {
    /// Shuffles this track appears in, ascending.
    pub fn shuffle_ids(&self) -> impl Iterator<Item = ShuffleId> + '_ {
        self.links.keys().copied()
    }

    #[must_use]
    pub fn link(&self, shuffle: ShuffleId) -> Option<&Link<I>> {
        self.links.get(&shuffle)
    }

    pub fn links(&self) -> impl Iterator<Item = (ShuffleId, &Link<I>)> + '_ {
        self.links.iter().map(|(id, link)| (*id, link))
    }
}

/// Per-track, per-shuffle predecessor/successor table.
#[derive(Debug, Clone)]
pub struct AdjacencyStore<I> {
    records: HashMap<I, AdjacencyRecord<I>>,
    /// Length of every linked shuffle, used to bound walks.
    lengths: BTreeMap<ShuffleId, usize>,
}

impl<I> Default for AdjacencyStore<I> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            lengths: BTreeMap::new(),
        }
    }
}

impl<I: Clone + Eq + Hash> AdjacencyStore<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link every consecutive pair of `sequence` under `shuffle`.
    ///
    /// The first track gets no predecessor and the last no successor.
    ///
    /// # Errors
    ///
    /// * [`IndexError::EmptyShuffle`] if `sequence` is empty
    /// * [`IndexError::DuplicateShuffle`] if `shuffle` was linked before
    ///
    /// In both cases the store is left untouched.
    pub fn link_shuffle(&mut self, sequence: &[I], shuffle: ShuffleId) -> Result<()> {
        if sequence.is_empty() {
            return Err(IndexError::EmptyShuffle { shuffle });
        }
        if self.is_linked(shuffle) {
            return Err(IndexError::DuplicateShuffle { shuffle });
        }

        for (position, track) in sequence.iter().enumerate() {
            let link = Link {
                prev: position.checked_sub(1).map(|p| sequence[p].clone()),
                next: sequence.get(position + 1).cloned(),
            };
            self.records
                .entry(track.clone())
                .or_default()
                .links
                .insert(shuffle, link);
        }
        self.lengths.insert(shuffle, sequence.len());

        debug!("Linked shuffle {shuffle} ({} tracks)", sequence.len());
        Ok(())
    }

    /// Every shuffle `track` has a link in. Empty for unknown tracks.
    #[must_use]
    pub fn shuffle_ids_containing(&self, track: &I) -> BTreeSet<ShuffleId> {
        self.records
            .get(track)
            .map(|record| record.shuffle_ids().collect())
            .unwrap_or_default()
    }

    /// The neighbor of `track` in `shuffle`, or `None` at the shuffle's
    /// boundary or when `track` is not part of `shuffle`.
    #[must_use]
    pub fn neighbor(&self, track: &I, shuffle: ShuffleId, direction: Direction) -> Option<&I> {
        self.link(track, shuffle)?.toward(direction)
    }

    #[must_use]
    pub fn link(&self, track: &I, shuffle: ShuffleId) -> Option<&Link<I>> {
        self.records.get(track)?.link(shuffle)
    }

    #[must_use]
    pub fn contains(&self, track: &I, shuffle: ShuffleId) -> bool {
        self.link(track, shuffle).is_some()
    }

    #[must_use]
    pub fn shuffle_len(&self, shuffle: ShuffleId) -> Option<usize> {
        self.lengths.get(&shuffle).copied()
    }

    #[must_use]
    pub fn is_linked(&self, shuffle: ShuffleId) -> bool {
        self.lengths.contains_key(&shuffle)
    }

    /// Highest shuffle ID linked so far.
    #[must_use]
    pub fn last_shuffle_id(&self) -> Option<ShuffleId> {
        self.lengths.keys().next_back().copied()
    }

    #[must_use]
    pub fn shuffle_count(&self) -> usize {
        self.lengths.len()
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> impl Iterator<Item = (&I, &AdjacencyRecord<I>)> + '_ {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.lengths.clear();
    }
}
