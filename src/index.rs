//! # Shuffle Pattern Index
//!
//! The owning object for one playback context: the adjacency store, the
//! pattern cache and the set of tracks seen in any shared pattern.
//!
//! ## Incremental Mining
//!
//! Linking a shuffle immediately mines every third track of it (positions
//! 0, 3, 6, …). Mining looks both ways from its anchor, so any run of three
//! or more tracks shared with an earlier shuffle contains a sampled
//! position and is found. A two-track run that falls entirely on
//! unsampled positions can be missed; [`ShuffleIndex::mine_patterns`] finds
//! it on demand.
//!
//! ## Pattern Cache
//!
//! Every mining pass *overwrites* the cached pattern of each shuffle it
//! touched, even when the new pattern is shorter than the one found from a
//! different anchor earlier. Keeping the longest pattern per shuffle would
//! be the alternative.
//!
//! ## Concurrency
//!
//! No internal locking. Callers that query while new shuffles arrive wrap
//! the index in a `Mutex` or equivalent.

use crate::adjacency::{AdjacencyStore, ShuffleId};
use crate::error::{IndexError, Result};
use crate::miner::{self, Pattern, Patterns};
use crate::queue;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::{self, Debug};
use std::hash::Hash;

/// Index-level tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Mine every `sample_stride`-th track of a newly linked shuffle.
    pub sample_stride: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { sample_stride: 3 }
    }
}

impl IndexConfig {
    /// # Errors
    ///
    /// [`IndexError::InvalidConfig`] for a zero stride.
    pub fn validate(&self) -> Result<()> {
        if self.sample_stride == 0 {
            return Err(IndexError::InvalidConfig("sample_stride must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Positions mined after linking a shuffle of `len` tracks.
    pub fn sampled_positions(&self, len: usize) -> impl Iterator<Item = usize> {
        (0..len).step_by(self.sample_stride.max(1))
    }
}

/// Counters describing the index contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub tracks: usize,
    pub shuffles: usize,
    pub cached_patterns: usize,
    pub shared_patterns: usize,
    pub tracked_tracks: usize,
}

/// Shuffle pattern index for one playback context.
#[derive(Debug, Clone)]
pub struct ShuffleIndex<I> {
    store: AdjacencyStore<I>,
    patterns: BTreeMap<ShuffleId, Pattern<I>>,
    tracked: HashSet<I>,
    config: IndexConfig,
}

impl<I> Default for ShuffleIndex<I> {
    fn default() -> Self {
        Self {
            store: AdjacencyStore::default(),
            patterns: BTreeMap::new(),
            tracked: HashSet::new(),
            config: IndexConfig::default(),
        }
    }
}

impl<I: Clone + Eq + Hash + Debug> ShuffleIndex<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Rejects an invalid `config`.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &AdjacencyStore<I> {
        &self.store
    }

    /// The ID [`ShuffleIndex::add_shuffle`] will assign next.
    ///
    /// # Errors
    ///
    /// [`IndexError::ShuffleIdsExhausted`] once `ShuffleId(u64::MAX)` is linked.
    pub fn next_shuffle_id(&self) -> Result<ShuffleId> {
        match self.store.last_shuffle_id() {
            None => Ok(ShuffleId(0)),
            Some(last) => last.next().ok_or(IndexError::ShuffleIdsExhausted { last }),
        }
    }

    /// Mine patterns around `anchor` now and write them to the cache.
    ///
    /// Returns only this pass's patterns. Shuffles whose pattern is longer
    /// than the anchor alone add all their tracks to the tracked set.
    pub fn mine_patterns(&mut self, anchor: &I) -> Patterns<I> {
        let patterns = miner::mine_patterns(&self.store, anchor);
        self.commit(&patterns);
        patterns
    }

    fn commit(&mut self, patterns: &Patterns<I>) {
        for (shuffle, pattern) in patterns {
            if pattern.is_shared() {
                self.tracked.extend(pattern.iter().cloned());
            }
            self.patterns.insert(*shuffle, pattern.clone());
        }
    }

    /// Rebuild the full order of `shuffle` from a track in it.
    ///
    /// # Errors
    ///
    /// [`IndexError::NotFound`] if `anchor` is not part of `shuffle`.
    pub fn reconstruct(&self, shuffle: ShuffleId, anchor: &I) -> Result<Vec<I>> {
        queue::reconstruct(&self.store, shuffle, anchor)
    }

    /// Every shuffle `track` appears in. Empty for unknown tracks.
    #[must_use]
    pub fn shuffle_ids(&self, track: &I) -> BTreeSet<ShuffleId> {
        self.store.shuffle_ids_containing(track)
    }

    /// Cached patterns of the given shuffles, in the given order. Shuffles
    /// without a cached pattern are skipped.
    pub fn cached_patterns<'a>(
        &self,
        shuffles: impl IntoIterator<Item = &'a ShuffleId>,
    ) -> Vec<&Pattern<I>> {
        shuffles
            .into_iter()
            .filter_map(|shuffle| self.patterns.get(shuffle))
            .collect()
    }

    #[must_use]
    pub fn cached_pattern(&self, shuffle: ShuffleId) -> Option<&Pattern<I>> {
        self.patterns.get(&shuffle)
    }

    pub fn all_cached_patterns(&self) -> impl Iterator<Item = (ShuffleId, &Pattern<I>)> + '_ {
        self.patterns.iter().map(|(id, pattern)| (*id, pattern))
    }

    /// Tracks that have been part of any shared pattern so far.
    #[must_use]
    pub const fn tracked_items(&self) -> &HashSet<I> {
        &self.tracked
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            tracks: self.store.track_count(),
            shuffles: self.store.shuffle_count(),
            cached_patterns: self.patterns.len(),
            shared_patterns: self.patterns.values().filter(|p| p.is_shared()).count(),
            tracked_tracks: self.tracked.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.shuffle_count() == 0
    }

    /// Forget every shuffle, pattern and tracked track. Configuration stays.
    pub fn reset(&mut self) {
        self.store.clear();
        self.patterns.clear();
        self.tracked.clear();
        info!("Shuffle index reset");
    }
}

impl<I: Clone + Eq + Hash + Debug + Send + Sync> ShuffleIndex<I> {
    /// Link `sequence` as shuffle `shuffle` and mine its sampled tracks.
    ///
    /// The sampled anchors are mined in parallel against the freshly linked
    /// store and committed in position order.
    ///
    /// # Errors
    ///
    /// * [`IndexError::EmptyShuffle`] for an empty `sequence`
    /// * [`IndexError::DuplicateShuffle`] if `shuffle` is already linked
    ///
    /// The index is unchanged on error.
    pub fn link_shuffle(&mut self, sequence: &[I], shuffle: ShuffleId) -> Result<()> {
        self.store.link_shuffle(sequence, shuffle)?;

        let anchors: Vec<&I> = self
            .config
            .sampled_positions(sequence.len())
            .map(|position| &sequence[position])
            .collect();

        let store = &self.store;
        let passes: Vec<Patterns<I>> = anchors
            .par_iter()
            .map(|anchor| miner::mine_patterns(store, *anchor))
            .collect();

        for patterns in &passes {
            self.commit(patterns);
        }

        debug!(
            "Shuffle {shuffle}: mined {} anchor(s), {} shared pattern(s) cached",
            anchors.len(),
            self.patterns.values().filter(|p| p.is_shared()).count()
        );
        Ok(())
    }

    /// Link `sequence` under the next free shuffle ID and return that ID.
    ///
    /// # Errors
    ///
    /// * [`IndexError::EmptyShuffle`] for an empty `sequence`
    /// * [`IndexError::ShuffleIdsExhausted`] when no higher ID is left
    ///
    /// # Examples
    ///
    /// ```
    /// use motif::ShuffleIndex;
    ///
    /// let mut index: ShuffleIndex<&str> = ShuffleIndex::new();
    /// index.add_shuffle(&["X", "A", "B", "C", "Y"])?;
    /// let second = index.add_shuffle(&["Z", "A", "B", "C", "W"])?;
    ///
    /// let pattern = index.cached_pattern(second).unwrap();
    /// assert_eq!(pattern.items(), &["A", "B", "C"]);
    /// # Ok::<(), motif::IndexError>(())
    /// ```
    pub fn add_shuffle(&mut self, sequence: &[I]) -> Result<ShuffleId> {
        let shuffle = self.next_shuffle_id()?;
        self.link_shuffle(sequence, shuffle)?;
        Ok(shuffle)
    }
}

impl<I: Clone + Eq + Hash + Debug> fmt::Display for ShuffleIndex<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.store.shuffle_count() == 0 {
            return writeln!(f, "Shuffle index is empty.");
        }

        let mut tracks: Vec<String> = self
            .store
            .records()
            .map(|(track, record)| {
                let links: Vec<String> = record
                    .links()
                    .map(|(shuffle, link)| {
                        format!("{shuffle}: {:?} <- -> {:?}", link.prev, link.next)
                    })
                    .collect();
                format!("{track:?}\n  {}", links.join("\n  "))
            })
            .collect();
        tracks.sort();

        writeln!(f, "--- Shuffle index ---")?;
        for track in &tracks {
            writeln!(f, "{track}")?;
        }

        let mut tracked: Vec<String> = self.tracked.iter().map(|t| format!("{t:?}")).collect();
        tracked.sort();
        writeln!(f, "--- Tracks in patterns ---")?;
        writeln!(f, "{}", tracked.join(", "))
    }
}
