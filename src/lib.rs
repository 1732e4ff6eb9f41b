//! Discover the runs of tracks that keep turning up together across shuffles.
//!
//! Every time a player reshuffles a playlist it produces a new order. Motif
//! stores each order as a *shuffle*, and for any track finds the longest
//! contiguous run around it that two or more shuffles share. It can also
//! rebuild any stored shuffle from one track known to be in it.
//!
//! Core modules:
//! - [`adjacency`] - Per-track, per-shuffle neighbor links
//! - [`miner`] - Bidirectional divergence walk that finds shared runs
//! - [`queue`] - Shuffle reconstruction
//! - [`index`] - The owning index: linking, incremental mining, pattern cache
//!
//! ### Supporting Modules
//!
//! - [`session`] - One index and one set of play counters per playback context
//! - [`source`] - Playback sources (recorded snapshots, simulated shuffles)
//! - [`daemon`] - Polling loop feeding a source into a session
//! - [`frequency`] - Play counters
//! - [`track`] - Track IDs and display metadata
//! - [`config`] - Configuration and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use motif::{ShuffleId, ShuffleIndex};
//!
//! let mut index: ShuffleIndex<&str> = ShuffleIndex::new();
//! index.add_shuffle(&["X", "A", "B", "C", "Y"])?;
//! index.add_shuffle(&["Z", "A", "B", "C", "W"])?;
//!
//! // Sampled mining already found the shared run
//! let ids = index.shuffle_ids(&"B");
//! for pattern in index.cached_patterns(&ids) {
//!     assert_eq!(pattern.items(), &["A", "B", "C"]);
//! }
//!
//! // Rebuild a stored shuffle from any of its tracks
//! assert_eq!(index.reconstruct(ShuffleId(0), &"C")?, vec!["X", "A", "B", "C", "Y"]);
//! # Ok::<(), motif::IndexError>(())
//! ```
//!
//! ## Known Limitations
//!
//! - A track repeated inside one shuffle only remembers the neighbors of
//!   its last occurrence.
//! - Two-track runs that fall between sampled positions are only found by
//!   mining on demand.
//! - The pattern cache keeps the most recent pattern per shuffle, not the
//!   longest.
//! - Everything is in memory; a new playback context starts from scratch.

pub mod adjacency;
pub mod cli;
pub mod completion;
pub mod config;
pub mod daemon;
pub mod error;
pub mod frequency;
pub mod index;
pub mod miner;
pub mod queue;
pub mod session;
pub mod source;
pub mod track;

pub use adjacency::{Direction, ShuffleId};
pub use error::IndexError;
pub use index::{IndexConfig, IndexStats, ShuffleIndex};
pub use miner::Pattern;
