//! # Playback Session
//!
//! Owns everything that belongs to the current playback context: one
//! [`ShuffleIndex`], one [`FrequencyTracker`] and the track metadata seen
//! so far. Switching context throws all of it away and starts fresh
//! instances, so patterns never mix across playlists.
//!
//! ## Observation Rules
//!
//! - a snapshot from a new context starts a new index and new counters
//! - a queue identical to the previous one is the same shuffle polled
//!   twice and is ignored
//! - an empty queue is skipped
//! - anything else becomes a new shuffle

use crate::adjacency::ShuffleId;
use crate::frequency::FrequencyTracker;
use crate::index::{IndexConfig, ShuffleIndex};
use crate::source::QueueSnapshot;
use crate::track::{TrackId, TrackMeta};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

/// What a call to [`PlaybackSession::observe`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Linked(ShuffleId),
    Unchanged,
    Empty,
}

/// A track as shown in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedTrack {
    pub id: TrackId,
    /// Display name from metadata, falling back to the ID.
    pub title: String,
    /// Occurrences across the shuffles of this context.
    pub plays: u32,
}

/// One distinct shared pattern and the shuffles it was cached for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternReport {
    pub shuffles: Vec<ShuffleId>,
    pub tracks: Vec<ReportedTrack>,
}

#[derive(Debug)]
pub struct PlaybackSession {
    context: Option<String>,
    index: ShuffleIndex<TrackId>,
    frequency: FrequencyTracker<TrackId>,
    metadata: HashMap<TrackId, TrackMeta>,
    last_queue: Option<Vec<TrackId>>,
    config: IndexConfig,
}

impl PlaybackSession {
    /// # Errors
    ///
    /// Returns an error for an invalid index configuration.
    pub fn new(config: IndexConfig) -> Result<Self> {
        Ok(Self {
            context: None,
            index: ShuffleIndex::with_config(config).context("Invalid index configuration")?,
            frequency: FrequencyTracker::new(),
            metadata: HashMap::new(),
            last_queue: None,
            config,
        })
    }

    /// Feed one polled snapshot into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the index rejects the queue.
    pub fn observe(&mut self, snapshot: QueueSnapshot) -> Result<Observation> {
        if self.context.as_deref() != Some(snapshot.context.as_str()) {
            self.switch_context(&snapshot.context)?;
        }

        if snapshot.queue.is_empty() {
            warn!("Empty queue in context `{}', skipping", snapshot.context);
            return Ok(Observation::Empty);
        }
        if self.last_queue.as_ref() == Some(&snapshot.queue) {
            debug!("Queue unchanged since last poll");
            return Ok(Observation::Unchanged);
        }

        let shuffle = self
            .index
            .add_shuffle(&snapshot.queue)
            .with_context(|| format!("Failed to add shuffle in context `{}'", snapshot.context))?;
        self.frequency.record(&snapshot.queue);
        self.metadata.extend(snapshot.tracks);
        self.last_queue = Some(snapshot.queue);

        debug!("Observed shuffle {shuffle} in context `{}'", snapshot.context);
        Ok(Observation::Linked(shuffle))
    }

    fn switch_context(&mut self, context: &str) -> Result<()> {
        match &self.context {
            Some(old) => info!("Playback context changed: `{old}' -> `{context}'"),
            None => info!("Playback context: `{context}'"),
        }

        self.index = ShuffleIndex::with_config(self.config).context("Invalid index configuration")?;
        self.frequency = FrequencyTracker::new();
        self.metadata.clear();
        self.last_queue = None;
        self.context = Some(context.to_string());
        Ok(())
    }

    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[must_use]
    pub const fn index(&self) -> &ShuffleIndex<TrackId> {
        &self.index
    }

    /// Mutable access, for on-demand mining.
    pub fn index_mut(&mut self) -> &mut ShuffleIndex<TrackId> {
        &mut self.index
    }

    #[must_use]
    pub const fn frequency(&self) -> &FrequencyTracker<TrackId> {
        &self.frequency
    }

    #[must_use]
    pub fn track(&self, id: &str) -> Option<&TrackMeta> {
        self.metadata.get(id)
    }

    /// Present a track with its title and play count.
    #[must_use]
    pub fn describe(&self, id: &TrackId) -> ReportedTrack {
        let title = self
            .track(id)
            .and_then(TrackMeta::display_name)
            .unwrap_or_else(|| id.clone());
        ReportedTrack {
            id: id.clone(),
            title,
            plays: self.frequency.count(id),
        }
    }

    /// Distinct shared patterns in the cache, longest first, then most
    /// shuffles, then earliest shuffle.
    #[must_use]
    pub fn report(&self, limit: usize) -> Vec<PatternReport> {
        let mut grouped: HashMap<&[TrackId], Vec<ShuffleId>> = HashMap::new();
        for (shuffle, pattern) in self.index.all_cached_patterns() {
            if pattern.is_shared() {
                grouped.entry(pattern.items()).or_default().push(shuffle);
            }
        }

        let mut ranked: Vec<(&[TrackId], Vec<ShuffleId>)> = grouped.into_iter().collect();
        ranked.sort_by_key(|(tracks, shuffles)| (Reverse(tracks.len()), Reverse(shuffles.len()), shuffles[0]));

        ranked
            .into_iter()
            .take(limit)
            .map(|(tracks, shuffles)| PatternReport {
                shuffles,
                tracks: tracks.iter().map(|id| self.describe(id)).collect(),
            })
            .collect()
    }

    /// Tracks seen in any shared pattern, most played first.
    #[must_use]
    pub fn tracked_tracks(&self) -> Vec<ReportedTrack> {
        let mut tracks: Vec<ReportedTrack> = self
            .index
            .tracked_items()
            .iter()
            .map(|id| self.describe(id))
            .collect();
        tracks.sort_by(|a, b| b.plays.cmp(&a.plays).then_with(|| a.id.cmp(&b.id)));
        tracks
    }
}
