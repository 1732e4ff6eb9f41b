//! # Polling Loop
//!
//! Drives a [`PlaybackSource`] into a [`PlaybackSession`]: poll, observe,
//! sleep, repeat until the source runs dry or the poll budget is spent.
//!
//! A snapshot the session rejects is logged and counted; the loop keeps
//! going. A source that fails to produce a snapshot ends the loop with its
//! error.

use crate::session::{Observation, PlaybackSession};
use crate::source::PlaybackSource;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;

/// What happened over one run of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub polls: usize,
    pub linked: usize,
    pub unchanged: usize,
    pub empty: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    max_polls: Option<usize>,
}

impl Poller {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval, max_polls: None }
    }

    /// Stop after `max_polls` snapshots even if the source has more.
    #[must_use]
    pub const fn with_max_polls(mut self, max_polls: usize) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    /// Poll `source` until it is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `source`.
    pub fn run<S: PlaybackSource + ?Sized>(
        &self,
        source: &mut S,
        session: &mut PlaybackSession,
    ) -> Result<PollSummary> {
        let mut summary = PollSummary::default();

        loop {
            if self.max_polls.is_some_and(|max| summary.polls >= max) {
                debug!("Poll budget of {} spent", summary.polls);
                break;
            }

            let Some(snapshot) = source
                .poll()
                .with_context(|| format!("Playback source failed after {} poll(s)", summary.polls))?
            else {
                break;
            };
            summary.polls += 1;

            match session.observe(snapshot) {
                Ok(Observation::Linked(_)) => summary.linked += 1,
                Ok(Observation::Unchanged) => summary.unchanged += 1,
                Ok(Observation::Empty) => summary.empty += 1,
                Err(e) => {
                    warn!("Rejected snapshot #{}: {e:#}", summary.polls);
                    summary.rejected += 1;
                }
            }

            if !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }
        }

        info!(
            "Polling finished: {} poll(s), {} new shuffle(s), {} unchanged, {} empty, {} rejected",
            summary.polls, summary.linked, summary.unchanged, summary.empty, summary.rejected
        );
        Ok(summary)
    }
}
