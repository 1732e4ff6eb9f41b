//! # Pattern Miner
//!
//! Given an anchor track, finds for every shuffle containing it the longest
//! contiguous run around the anchor that at least one *other* shuffle
//! shares.
//!
//! ## Divergence Walk
//!
//! Each direction is walked independently. All shuffles containing the
//! anchor start in one group. At every step the group records its run so
//! far for each member, then splits its members by the track that follows
//! the frontier in their own shuffle:
//!
//! ```text
//!              ┌─ C ─┬─ D   {0}      stops, singleton
//!   B ─{0,1,2}─┤     └─ E   {1}      stops, singleton
//!              └─ X   {2}            stops, singleton
//!
//!   shuffle 0 → [B, C]   shuffle 1 → [B, C]   shuffle 2 → [B]
//! ```
//!
//! A group with fewer than two members is no longer shared and stops.
//! Members that reach the end of their shuffle drop out but keep the run
//! recorded for them. The backward and forward runs are then joined around
//! the anchor.

use crate::adjacency::{AdjacencyStore, Direction, ShuffleId};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::ops::Deref;

/// A contiguous run of tracks shared by two or more shuffles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern<I>(Vec<I>);

impl<I> Pattern<I> {
    /// A pattern of a single track is only the anchor agreeing with itself.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.0.len() > 1
    }

    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.0
    }
}

impl<I> Deref for Pattern<I> {
    type Target = [I];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<I> From<Vec<I>> for Pattern<I> {
    fn from(items: Vec<I>) -> Self {
        Self(items)
    }
}

/// Best pattern per shuffle from one mining pass.
pub type Patterns<I> = BTreeMap<ShuffleId, Pattern<I>>;

/// One branch of the walk: shuffles that still agree, the run they share
/// (walk order, anchor first) and the track they currently sit on.
struct Group<'a, I> {
    shuffles: Vec<ShuffleId>,
    run: Vec<I>,
    frontier: &'a I,
}

/// Walk away from `anchor` in one direction, splitting on disagreement.
///
/// Returns, per shuffle, the deepest run recorded for it in walk order
/// (anchor first). Shuffles that never shared a step are absent.
///
/// A member stops extending once its run is as long as its own shuffle.
/// This only matters for shuffles with repeated tracks, whose
/// last-write-wins links can form cycles.
pub fn walk<'a, I: Clone + Eq + Hash>(
    store: &'a AdjacencyStore<I>,
    anchor: &'a I,
    shuffles: &BTreeSet<ShuffleId>,
    direction: Direction,
) -> BTreeMap<ShuffleId, Vec<I>> {
    let mut best = BTreeMap::new();
    let mut pending = vec![Group {
        shuffles: shuffles.iter().copied().collect(),
        run: Vec::new(),
        frontier: anchor,
    }];

    while let Some(Group { shuffles, mut run, frontier }) = pending.pop() {
        if shuffles.len() < 2 {
            continue;
        }
        run.push(frontier.clone());

        let mut branches: HashMap<&'a I, Vec<ShuffleId>> = HashMap::new();
        for shuffle in shuffles {
            best.insert(shuffle, run.clone());

            if run.len() >= store.shuffle_len(shuffle).unwrap_or(0) {
                continue;
            }
            if let Some(next) = store.neighbor(frontier, shuffle, direction) {
                branches.entry(next).or_default().push(shuffle);
            }
        }

        trace!(
            "{direction:?} walk at depth {}: {} branch(es)",
            run.len(),
            branches.len()
        );

        pending.extend(branches.into_iter().map(|(next, members)| Group {
            shuffles: members,
            run: run.clone(),
            frontier: next,
        }));
    }

    best
}

/// Join a backward run and a forward run around their shared anchor.
///
/// Both runs start with the anchor; the backward one is reversed and its
/// copy of the anchor dropped.
#[must_use]
pub fn combine<I: Clone>(backward: &[I], forward: &[I]) -> Pattern<I> {
    backward
        .iter()
        .skip(1)
        .rev()
        .chain(forward.iter())
        .cloned()
        .collect::<Vec<_>>()
        .into()
}

/// Mine the best shared pattern of every shuffle containing `anchor`.
///
/// Returns an empty map when fewer than two shuffles contain the anchor.
/// Otherwise every such shuffle gets an entry, possibly just `[anchor]`.
///
/// # Examples
///
/// ```
/// use motif::adjacency::{AdjacencyStore, ShuffleId};
/// use motif::miner::mine_patterns;
///
/// let mut store = AdjacencyStore::new();
/// store.link_shuffle(&["X", "A", "B", "C", "Y"], ShuffleId(0)).unwrap();
/// store.link_shuffle(&["Z", "A", "B", "C", "W"], ShuffleId(1)).unwrap();
///
/// let patterns = mine_patterns(&store, &"B");
/// assert_eq!(patterns[&ShuffleId(0)].items(), &["A", "B", "C"]);
/// assert_eq!(patterns[&ShuffleId(1)].items(), &["A", "B", "C"]);
/// ```
#[must_use]
pub fn mine_patterns<I: Clone + Eq + Hash>(store: &AdjacencyStore<I>, anchor: &I) -> Patterns<I> {
    let shuffles = store.shuffle_ids_containing(anchor);
    if shuffles.len() < 2 {
        return Patterns::new();
    }

    let backward = walk(store, anchor, &shuffles, Direction::Backward);
    let forward = walk(store, anchor, &shuffles, Direction::Forward);

    let patterns: Patterns<I> = shuffles
        .iter()
        .map(|shuffle| {
            let before = backward.get(shuffle).map_or(&[][..], Vec::as_slice);
            let after = forward.get(shuffle).map_or(&[][..], Vec::as_slice);
            (*shuffle, combine(before, after))
        })
        .collect();

    debug!(
        "Mined {} shuffle(s), longest pattern {}",
        patterns.len(),
        patterns.values().map(|p| p.len()).max().unwrap_or(0)
    );
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(shuffles: &[&[&'static str]]) -> AdjacencyStore<&'static str> {
        let mut store = AdjacencyStore::new();
        for (id, shuffle) in shuffles.iter().enumerate() {
            store.link_shuffle(shuffle, ShuffleId(id as u64)).unwrap();
        }
        store
    }

    fn contiguous_in<T: PartialEq>(run: &[T], sequence: &[T]) -> bool {
        sequence.windows(run.len()).any(|window| window == run)
    }

    #[test]
    fn test_shared_run_on_both_sides() {
        let store = store_with(&[&["X", "A", "B", "C", "Y"], &["Z", "A", "B", "C", "W"]]);
        let patterns = mine_patterns(&store, &"B");

        assert_eq!(patterns.len(), 2);
        for pattern in patterns.values() {
            assert_eq!(pattern.items(), &["A", "B", "C"]);
        }
    }

    #[test]
    fn test_branching_groups() {
        let store = store_with(&[&["A", "B", "C", "D"], &["A", "B", "C", "E"], &["Q", "B", "X"]]);
        let patterns = mine_patterns(&store, &"B");

        assert_eq!(patterns[&ShuffleId(0)].items(), &["A", "B", "C"]);
        assert_eq!(patterns[&ShuffleId(1)].items(), &["A", "B", "C"]);
        // shuffle 2 contains B but agrees with nobody on either side
        assert_eq!(patterns[&ShuffleId(2)].items(), &["B"]);
        assert!(!patterns[&ShuffleId(2)].is_shared());
    }

    #[test]
    fn test_split_into_two_pairs() {
        let store = store_with(&[
            &["A", "B", "C"],
            &["A", "B", "C"],
            &["A", "B", "D"],
            &["A", "B", "D"],
        ]);
        let patterns = mine_patterns(&store, &"A");

        assert_eq!(patterns[&ShuffleId(0)].items(), &["A", "B", "C"]);
        assert_eq!(patterns[&ShuffleId(1)].items(), &["A", "B", "C"]);
        assert_eq!(patterns[&ShuffleId(2)].items(), &["A", "B", "D"]);
        assert_eq!(patterns[&ShuffleId(3)].items(), &["A", "B", "D"]);
    }

    #[test]
    fn test_short_member_does_not_cap_longer_ones() {
        let store = store_with(&[&["A", "B", "C"], &["A", "B", "C", "D", "E"], &["A", "B", "C", "D", "E"]]);
        let patterns = mine_patterns(&store, &"A");

        assert_eq!(patterns[&ShuffleId(0)].items(), &["A", "B", "C"]);
        assert_eq!(patterns[&ShuffleId(1)].items(), &["A", "B", "C", "D", "E"]);
        assert_eq!(patterns[&ShuffleId(2)].items(), &["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_single_track_shuffle_in_group() {
        let store = store_with(&[
            &["A", "C", "B"],
            &["B"],
            &["C", "B"],
            &["B", "C", "A"],
            &["C", "B", "A"],
        ]);
        let patterns = mine_patterns(&store, &"B");

        assert_eq!(patterns[&ShuffleId(0)].items(), &["C", "B"]);
        assert_eq!(patterns[&ShuffleId(1)].items(), &["B"]);
        assert_eq!(patterns[&ShuffleId(2)].items(), &["C", "B"]);
        assert_eq!(patterns[&ShuffleId(3)].items(), &["B"]);
        assert_eq!(patterns[&ShuffleId(4)].items(), &["C", "B"]);
    }

    /// Longest run shared with any other shuffle, one side at a time,
    /// found by comparing every pair of shuffles directly.
    fn brute_force(shuffles: &[Vec<&'static str>], anchor: &str) -> BTreeMap<ShuffleId, Vec<&'static str>> {
        let holders: Vec<(usize, usize)> = shuffles
            .iter()
            .enumerate()
            .filter_map(|(id, seq)| seq.iter().position(|t| *t == anchor).map(|at| (id, at)))
            .collect();
        if holders.len() < 2 {
            return BTreeMap::new();
        }

        holders
            .iter()
            .map(|&(id, at)| {
                let seq = &shuffles[id];
                let mut back = 1;
                let mut ahead = 1;
                for &(other, other_at) in holders.iter().filter(|(o, _)| *o != id) {
                    let peer = &shuffles[other];
                    let shared_back = (0..=at.min(other_at))
                        .take_while(|k| seq[at - k] == peer[other_at - k])
                        .count();
                    let shared_ahead = (0..(seq.len() - at).min(peer.len() - other_at))
                        .take_while(|k| seq[at + k] == peer[other_at + k])
                        .count();
                    back = back.max(shared_back);
                    ahead = ahead.max(shared_ahead);
                }
                (ShuffleId(id as u64), seq[at + 1 - back..at + ahead].to_vec())
            })
            .collect()
    }

    #[test]
    fn test_matches_brute_force_on_random_shuffles() {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::{Rng, SeedableRng};

        const TRACKS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for case in 0..300 {
            let count = rng.gen_range(2..=6);
            let shuffles: Vec<Vec<&'static str>> = (0..count)
                .map(|_| {
                    let mut tracks = TRACKS.to_vec();
                    tracks.shuffle(&mut rng);
                    tracks.truncate(rng.gen_range(1..=TRACKS.len()));
                    tracks
                })
                .collect();

            let mut store: AdjacencyStore<&str> = AdjacencyStore::new();
            for (id, shuffle) in shuffles.iter().enumerate() {
                store.link_shuffle(shuffle.as_slice(), ShuffleId(id as u64)).unwrap();
            }

            for anchor in TRACKS {
                let mined: BTreeMap<ShuffleId, Vec<&str>> = mine_patterns(&store, &anchor)
                    .into_iter()
                    .map(|(id, pattern)| (id, pattern.to_vec()))
                    .collect();
                assert_eq!(
                    mined,
                    brute_force(&shuffles, anchor),
                    "case {case}, anchor {anchor}, shuffles {shuffles:?}"
                );
            }
        }
    }

    #[test]
    fn test_needs_two_shuffles() {
        let store = store_with(&[&["A", "B", "C"], &["D", "E"]]);

        assert!(mine_patterns(&store, &"B").is_empty());
        assert!(mine_patterns(&store, &"never-seen").is_empty());
    }

    #[test]
    fn test_patterns_are_contiguous_in_their_shuffle() {
        let shuffles: &[&[&str]] = &[
            &["A", "D", "E", "C", "B", "O", "T"],
            &["B", "D", "E", "C", "A", "F", "W"],
            &["D", "B", "E", "C", "A", "F", "S"],
            &["X", "D", "B", "E", "C", "A", "P"],
        ];
        let store = store_with(shuffles);

        for anchor in ["A", "B", "C", "D", "E", "F"] {
            for (shuffle, pattern) in mine_patterns(&store, &anchor) {
                let sequence = shuffles[shuffle.0 as usize];
                assert!(
                    contiguous_in(pattern.items(), sequence),
                    "{pattern:?} is not a run of shuffle {shuffle}"
                );
            }
        }
    }

    #[test]
    fn test_each_side_is_shared_with_another_shuffle() {
        let shuffles: &[&[&str]] = &[
            &["A", "D", "E", "C", "B", "O", "T"],
            &["B", "D", "E", "C", "A", "F", "W"],
            &["D", "B", "E", "C", "A", "F", "S"],
            &["X", "D", "B", "E", "C", "A", "P"],
        ];
        let store = store_with(shuffles);

        for anchor in ["A", "C", "E"] {
            for (shuffle, pattern) in mine_patterns(&store, &anchor) {
                let at = pattern.iter().position(|t| *t == anchor).unwrap();
                for side in [&pattern[..=at], &pattern[at..]] {
                    let partners = shuffles
                        .iter()
                        .enumerate()
                        .filter(|(other, seq)| *other as u64 != shuffle.0 && contiguous_in(side, seq))
                        .count();
                    assert!(partners >= 1, "{side:?} of shuffle {shuffle} is not shared");
                }
            }
        }
    }

    #[test]
    fn test_known_patterns_around_c() {
        let store = store_with(&[
            &["A", "D", "E", "C", "B", "O", "T"],
            &["B", "D", "E", "C", "A", "F", "W"],
            &["D", "B", "E", "C", "A", "F", "S"],
            &["X", "D", "B", "E", "C", "A", "P"],
        ]);
        let patterns = mine_patterns(&store, &"C");

        assert_eq!(patterns[&ShuffleId(0)].items(), &["D", "E", "C"]);
        assert_eq!(patterns[&ShuffleId(1)].items(), &["D", "E", "C", "A", "F"]);
        assert_eq!(patterns[&ShuffleId(2)].items(), &["D", "B", "E", "C", "A", "F"]);
        assert_eq!(patterns[&ShuffleId(3)].items(), &["D", "B", "E", "C", "A"]);
    }

    #[test]
    fn test_repeated_tracks_terminate() {
        // last-write-wins turns A <-> B into a cycle
        let store = store_with(&[&["X", "A", "B", "A"], &["X", "A", "B", "A"]]);
        let patterns = mine_patterns(&store, &"B");

        assert_eq!(patterns.len(), 2);
        assert!(patterns.values().all(|p| p.len() < 2 * 4));
    }

    #[test]
    fn test_combine_drops_duplicate_anchor() {
        let pattern = combine(&["C", "B", "A"], &["C", "D"]);
        assert_eq!(pattern.items(), &["A", "B", "C", "D"]);

        let lone = combine::<&str>(&[], &["C"]);
        assert_eq!(lone.items(), &["C"]);
    }
}
