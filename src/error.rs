//! Error taxonomy for the shuffle index.
//!
//! Lookups on items or shuffles the index has never seen are *not* errors;
//! they return empty results. Only the cases below are surfaced.

use crate::adjacency::ShuffleId;
use thiserror::Error;

/// Errors raised by the index core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The item has no link under the requested shuffle. `item` holds its
    /// `Debug` rendering.
    #[error("track {item} is not part of shuffle {shuffle}")]
    NotFound { shuffle: ShuffleId, item: String },

    /// An empty sequence was offered as a shuffle.
    #[error("shuffle {shuffle} is empty")]
    EmptyShuffle { shuffle: ShuffleId },

    /// The shuffle ID was already linked. Linking it again would corrupt
    /// the neighbor pointers of every item it shares with the old shuffle.
    #[error("shuffle {shuffle} has already been linked")]
    DuplicateShuffle { shuffle: ShuffleId },

    /// Every ID after `last` would overflow.
    #[error("no shuffle IDs left after {last}")]
    ShuffleIdsExhausted { last: ShuffleId },

    #[error("invalid index configuration: {0}")]
    InvalidConfig(String),
}

impl IndexError {
    /// `true` for caller mistakes (as opposed to "nothing to show").
    #[must_use]
    pub const fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Self::EmptyShuffle { .. }
                | Self::DuplicateShuffle { .. }
                | Self::ShuffleIdsExhausted { .. }
                | Self::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
