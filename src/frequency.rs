//! Play counters for one playback context.
//!
//! Counts how often each track shows up across the shuffles of a context.
//! Independent of the index; the two are combined when reporting.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct FrequencyTracker<I> {
    counts: HashMap<I, u32>,
    shuffles: u32,
}

impl<I> Default for FrequencyTracker<I> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            shuffles: 0,
        }
    }
}

impl<I: Clone + Eq + Hash> FrequencyTracker<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every occurrence in one shuffle.
    pub fn record(&mut self, shuffle: &[I]) {
        for track in shuffle {
            *self.counts.entry(track.clone()).or_insert(0) += 1;
        }
        self.shuffles += 1;
    }

    #[must_use]
    pub fn count(&self, track: &I) -> u32 {
        self.counts.get(track).copied().unwrap_or(0)
    }

    /// Number of shuffles recorded.
    #[must_use]
    pub const fn shuffles(&self) -> u32 {
        self.shuffles
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.shuffles = 0;
    }
}

impl<I: Clone + Eq + Hash + Ord> FrequencyTracker<I> {
    /// The `n` most counted tracks, ties broken by track order.
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(&I, u32)> {
        let mut ranked: Vec<(&I, u32)> = self.counts.iter().map(|(t, c)| (t, *c)).collect();
        ranked.sort_by(|(ta, a), (tb, b)| b.cmp(a).then_with(|| ta.cmp(tb)));
        ranked.truncate(n);
        ranked
    }
}
