//! # Motif - Shuffle Pattern Miner
//!
//! Motif watches the queues a music player produces each time it reshuffles
//! a playlist and finds the runs of tracks that keep coming back together.
//!
//! ## Architecture
//!
//! - `index`: adjacency store, divergence walk and pattern cache
//! - `session`: one index per playback context
//! - `source` / `daemon`: where snapshots come from and the loop that polls them
//! - `config`: configuration and data directory management
//! - `cli` / `completion`: command-line interface definitions
//!
//! ## Usage
//!
//! ```bash
//! # Replay a recorded listening session
//! motif ingest session.jsonl
//!
//! # Try it on a playlist without a player
//! motif simulate playlist.txt --rounds 40 --seed 1
//!
//! # Rebuild a stored shuffle
//! motif queue session.jsonl --shuffle 2 --track 4uLU6hMCjMI75M1A2tKUQC
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{info, warn};
use motif::cli::{self, Tuning};
use motif::completion;
use motif::config::RuntimeConfig;
use motif::daemon::{PollSummary, Poller};
use motif::session::PlaybackSession;
use motif::source::{PlaybackSource, ShuffledPlaylistSource, SnapshotReader};
use motif::ShuffleId;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// Apply command-line overrides on top of the loaded configuration.
fn apply_tuning(mut config: RuntimeConfig, tuning: &Tuning) -> Result<RuntimeConfig> {
    if let Some(stride) = tuning.stride {
        config.sample_stride = stride;
    }
    if let Some(limit) = tuning.limit {
        config.report_limit = limit;
    }
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

/// Poll `source` dry into a fresh session.
fn run_source<S: PlaybackSource + ?Sized>(
    source: &mut S,
    config: &RuntimeConfig,
) -> Result<(PlaybackSession, PollSummary)> {
    let mut session = PlaybackSession::new(config.index_config())?;
    let summary = Poller::new(config.poll_interval()).run(source, &mut session)?;
    Ok((session, summary))
}

fn replay(snapshots: &Path, config: &RuntimeConfig) -> Result<(PlaybackSession, PollSummary)> {
    info!("Replaying snapshots from: {}", snapshots.display());
    let mut reader = SnapshotReader::open(snapshots)?;
    run_source(&mut reader, config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to encode output")?);
    Ok(())
}

fn print_report(session: &PlaybackSession, summary: &PollSummary, limit: usize) -> Result<()> {
    print_json(&json!({
        "context": session.context(),
        "summary": summary,
        "stats": session.index().stats(),
        "patterns": session.report(limit),
    }))
}

/// Main entry point for Motif.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug motif ingest session.jsonl` - Enable debug logging
/// - `RUST_LOG=motif::index=trace motif simulate list.txt` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Ingest { snapshots, tuning } => {
            let config = apply_tuning(RuntimeConfig::load()?, &tuning)?;
            let (session, summary) = replay(&snapshots, &config)?;
            print_report(&session, &summary, config.report_limit)?;
        }
        cli::Command::Simulate { playlist, rounds, seed, tuning } => {
            let config = apply_tuning(RuntimeConfig::load()?, &tuning)?;
            info!("Simulating {rounds} shuffle(s) of {}", playlist.display());
            let mut source = ShuffledPlaylistSource::from_file(&playlist, rounds, seed)?;
            let (session, summary) = run_source(&mut source, &config)?;
            print_report(&session, &summary, config.report_limit)?;
        }
        cli::Command::Patterns { snapshots, track, tuning } => {
            let config = apply_tuning(RuntimeConfig::load()?, &tuning)?;
            let (mut session, _) = replay(&snapshots, &config)?;

            if session.index().shuffle_ids(&track).is_empty() {
                warn!("Track {track} is not part of any stored shuffle");
            }
            let patterns = session.index_mut().mine_patterns(&track);
            let patterns: Vec<_> = patterns
                .into_iter()
                .take(config.report_limit)
                .map(|(shuffle, pattern)| {
                    json!({
                        "shuffle": shuffle,
                        "shared": pattern.is_shared(),
                        "tracks": pattern.iter().map(|id| session.describe(id)).collect::<Vec<_>>(),
                    })
                })
                .collect();
            print_json(&json!({ "track": track, "patterns": patterns }))?;
        }
        cli::Command::Queue { snapshots, shuffle, track } => {
            let config = RuntimeConfig::load()?;
            let (session, _) = replay(&snapshots, &config)?;
            let order = session
                .index()
                .reconstruct(ShuffleId(shuffle), &track)
                .with_context(|| format!("Failed to rebuild shuffle {shuffle}"))?;
            print_json(&order)?;
        }
        cli::Command::Stats { snapshots, tuning } => {
            let config = apply_tuning(RuntimeConfig::load()?, &tuning)?;
            let (session, summary) = replay(&snapshots, &config)?;
            let mut tracked = session.tracked_tracks();
            tracked.truncate(config.report_limit);
            print_json(&json!({
                "context": session.context(),
                "summary": summary,
                "stats": session.index().stats(),
                "tracked": tracked,
                "most_played": session.frequency().most_common(config.report_limit),
            }))?;
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}
