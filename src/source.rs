//! # Playback Sources
//!
//! Where shuffles come from. A source is polled on some cadence and hands
//! back the current play queue of a context, plus whatever metadata it has
//! for the tracks in it.
//!
//! ## Provided Sources
//!
//! - [`SnapshotReader`]: replays recorded snapshots, one JSON object per line
//! - [`ShuffledPlaylistSource`]: reshuffles a fixed playlist on every poll,
//!   handy for exercising the index without a real player
//!
//! ## Snapshot Format
//!
//! ```text
//! {"context": "playlist:chill", "queue": ["t1", "t2", "t3"], "tracks": {"t1": {"name": "So What"}}}
//! ```
//!
//! `tracks` is optional. Blank lines and lines starting with `#` are skipped.

use crate::track::{TrackId, TrackMeta};
use anyhow::{Context, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The play queue of one context at one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Playlist, album or other context the queue was shuffled from.
    pub context: String,
    pub queue: Vec<TrackId>,
    #[serde(default)]
    pub tracks: HashMap<TrackId, TrackMeta>,
}

impl QueueSnapshot {
    #[must_use]
    pub fn new(context: impl Into<String>, queue: Vec<TrackId>) -> Self {
        Self {
            context: context.into(),
            queue,
            tracks: HashMap::new(),
        }
    }
}

/// Something that can be polled for the current play queue.
pub trait PlaybackSource {
    /// Next snapshot, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn poll(&mut self) -> Result<Option<QueueSnapshot>>;
}

/// Replays snapshots from JSON lines.
#[derive(Debug)]
pub struct SnapshotReader<R> {
    reader: R,
    line_number: usize,
}

impl SnapshotReader<BufReader<File>> {
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open snapshot file {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> SnapshotReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_number: 0 }
    }
}

impl<R: BufRead> PlaybackSource for SnapshotReader<R> {
    fn poll(&mut self) -> Result<Option<QueueSnapshot>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("Failed to read snapshot line {}", self.line_number + 1))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let snapshot: QueueSnapshot = serde_json::from_str(trimmed)
                .with_context(|| format!("Invalid snapshot on line {}", self.line_number))?;
            debug!(
                "Read snapshot for `{}' ({} tracks) from line {}",
                snapshot.context,
                snapshot.queue.len(),
                self.line_number
            );
            return Ok(Some(snapshot));
        }
    }
}

/// Simulated player: every poll is a fresh shuffle of the same playlist.
#[derive(Debug)]
pub struct ShuffledPlaylistSource {
    context: String,
    playlist: Vec<TrackId>,
    rounds_left: usize,
    rng: StdRng,
}

impl ShuffledPlaylistSource {
    /// `seed` makes the shuffles reproducible.
    #[must_use]
    pub fn new(context: impl Into<String>, playlist: Vec<TrackId>, rounds: usize, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            context: context.into(),
            playlist,
            rounds_left: rounds,
            rng,
        }
    }

    /// Read a playlist with one track ID per line. The file stem becomes
    /// the context name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or lists no tracks.
    pub fn from_file(path: &Path, rounds: usize, seed: Option<u64>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read playlist {}", path.display()))?;
        let playlist: Vec<TrackId> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        if playlist.is_empty() {
            anyhow::bail!("Playlist {} contains no tracks", path.display());
        }

        let context = path
            .file_stem()
            .map_or_else(|| "playlist".to_string(), |stem| stem.to_string_lossy().into_owned());
        Ok(Self::new(context, playlist, rounds, seed))
    }
}

impl PlaybackSource for ShuffledPlaylistSource {
    fn poll(&mut self) -> Result<Option<QueueSnapshot>> {
        if self.rounds_left == 0 {
            return Ok(None);
        }
        self.rounds_left -= 1;

        let mut queue = self.playlist.clone();
        queue.shuffle(&mut self.rng);
        Ok(Some(QueueSnapshot::new(self.context.clone(), queue)))
    }
}
