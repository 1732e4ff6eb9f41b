//! # Shuffle Reconstruction
//!
//! Rebuilds the full play order of one stored shuffle from any track known
//! to be in it: walk `prev` links to the start, then `next` links to the
//! end.

use crate::adjacency::{AdjacencyStore, Direction, ShuffleId};
use crate::error::{IndexError, Result};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

/// Reconstruct shuffle `shuffle` around `anchor`.
///
/// The anchor appears exactly once. The walk never yields more tracks than
/// the shuffle was linked with, so repeated tracks (which may form link
/// cycles) still terminate.
///
/// # Errors
///
/// [`IndexError::NotFound`] if `anchor` has no link under `shuffle`.
///
/// # Examples
///
/// ```
/// use motif::adjacency::{AdjacencyStore, ShuffleId};
/// use motif::queue::reconstruct;
///
/// let mut store = AdjacencyStore::new();
/// store.link_shuffle(&["B", "A", "D", "E"], ShuffleId(0))?;
///
/// assert_eq!(reconstruct(&store, ShuffleId(0), &"D")?, vec!["B", "A", "D", "E"]);
/// # Ok::<(), motif::IndexError>(())
/// ```
pub fn reconstruct<I: Clone + Eq + Hash + Debug>(
    store: &AdjacencyStore<I>,
    shuffle: ShuffleId,
    anchor: &I,
) -> Result<Vec<I>> {
    let link = store.link(anchor, shuffle).ok_or_else(|| IndexError::NotFound {
        shuffle,
        item: format!("{anchor:?}"),
    })?;
    let capacity = store.shuffle_len(shuffle).unwrap_or(1);

    let mut queue = VecDeque::with_capacity(capacity);
    queue.push_back(anchor.clone());

    let mut cursor = link.prev.as_ref();
    while let Some(track) = cursor {
        if queue.len() >= capacity {
            break;
        }
        queue.push_front(track.clone());
        cursor = store.neighbor(track, shuffle, Direction::Backward);
    }

    let mut cursor = link.next.as_ref();
    while let Some(track) = cursor {
        if queue.len() >= capacity {
            break;
        }
        queue.push_back(track.clone());
        cursor = store.neighbor(track, shuffle, Direction::Forward);
    }

    Ok(queue.into())
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

    #[test]
    fn test_round_trip_from_every_track() {
        let original = ["X", "D", "B", "E", "C", "A", "P"];
        let store = store_with(&[&["B", "A", "D", "E"], &original]);

        for track in &original {
            let queue = reconstruct(&store, ShuffleId(1), track).unwrap();
            assert_eq!(queue, original.to_vec(), "reconstructed from {track}");
        }
    }

    #[test]
    fn test_other_shuffles_do_not_leak() {
        let store = store_with(&[&["B", "A", "D", "E"], &["A", "D", "E", "C"]]);

        assert_eq!(reconstruct(&store, ShuffleId(0), &"D").unwrap(), vec!["B", "A", "D", "E"]);
        assert_eq!(reconstruct(&store, ShuffleId(1), &"D").unwrap(), vec!["A", "D", "E", "C"]);
    }

    #[test]
    fn test_single_track() {
        let store = store_with(&[&["solo"]]);
        assert_eq!(reconstruct(&store, ShuffleId(0), &"solo").unwrap(), vec!["solo"]);
    }

    #[test]
    fn test_not_found() {
        let store = store_with(&[&["B", "A"], &["C", "D"]]);

        let err = reconstruct(&store, ShuffleId(1), &"A").unwrap_err();
        assert_eq!(err, IndexError::NotFound { shuffle: ShuffleId(1), item: "\"A\"".to_string() });
        assert!(reconstruct(&store, ShuffleId(9), &"A").is_err());
        assert!(reconstruct(&store, ShuffleId(0), &"never-seen").is_err());
    }

    #[test]
    fn test_repeated_tracks_terminate() {
        let store = store_with(&[&["X", "A", "B", "A"]]);
        let queue = reconstruct(&store, ShuffleId(0), &"B").unwrap();

        assert_eq!(queue.len(), 4);
    }
}
