//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Motif using Clap derive macros.
//!
//! ## Commands
//!
//! - `ingest`: Replay recorded queue snapshots and report shared patterns
//! - `simulate`: Shuffle a playlist repeatedly and report shared patterns
//! - `patterns`: Mine the patterns around one track on demand
//! - `queue`: Rebuild the full order of one stored shuffle
//! - `stats`: Show index counters and the tracks found in patterns
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! motif ingest session.jsonl --limit 5
//! motif simulate playlist.txt --rounds 50 --seed 7
//! motif queue session.jsonl --shuffle 3 --track 4uLU6hMCjMI75M1A2tKUQC
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "motif")]
#[command(about = "Motif: find the runs of tracks your shuffles keep repeating")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for values from the configuration file.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Tuning {
    /// Mine every n-th track of each new shuffle
    #[arg(long, env = "MOTIF_STRIDE")]
    pub stride: Option<usize>,

    /// Maximum number of patterns to print
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay queue snapshots and report shared patterns
    ///
    /// Reads one JSON snapshot per line ({"context", "queue", "tracks"}),
    /// feeds each into a fresh session exactly as a live poller would and
    /// prints the distinct shared patterns as JSON, longest first.
    Ingest {
        /// JSON lines file of recorded snapshots
        snapshots: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Shuffle a playlist repeatedly and report shared patterns
    ///
    /// The playlist file lists one track ID per line. Every round is an
    /// independent shuffle; a fixed seed makes the run reproducible.
    Simulate {
        /// Playlist file, one track ID per line
        playlist: PathBuf,

        /// Number of shuffles to generate
        #[arg(long, default_value = "10")]
        rounds: usize,

        /// Seed for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Mine the patterns around one track
    ///
    /// Replays the snapshots, then runs a mining pass anchored on the given
    /// track and prints the pattern found for every shuffle containing it.
    Patterns {
        /// JSON lines file of recorded snapshots
        snapshots: PathBuf,

        /// Track ID to anchor the mining pass on
        #[arg(long)]
        track: String,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Rebuild the full order of one stored shuffle
    Queue {
        /// JSON lines file of recorded snapshots
        snapshots: PathBuf,

        /// Shuffle ID (0 is the first shuffle of the last context)
        #[arg(long)]
        shuffle: u64,

        /// Any track known to be in that shuffle
        #[arg(long)]
        track: String,
    },

    /// Show index counters and the tracks found in patterns
    Stats {
        /// JSON lines file of recorded snapshots
        snapshots: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Generate shell completions
    ///
    /// Usage: motif completion bash > ~/.local/share/bash-completion/completions/motif
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_queue() {
        let args = Args::try_parse_from(["motif", "queue", "s.jsonl", "--shuffle", "3", "--track", "B"]).unwrap();

        match args.command {
            Command::Queue { snapshots, shuffle, track } => {
                assert_eq!(snapshots, PathBuf::from("s.jsonl"));
                assert_eq!(shuffle, 3);
                assert_eq!(track, "B");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_simulate_defaults() {
        let args = Args::try_parse_from(["motif", "simulate", "list.txt", "--limit", "5"]).unwrap();

        match args.command {
            Command::Simulate { rounds, seed, tuning, .. } => {
                assert_eq!(rounds, 10);
                assert_eq!(seed, None);
                assert_eq!(tuning.limit, Some(5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_patterns_requires_track() {
        assert!(Args::try_parse_from(["motif", "patterns", "s.jsonl"]).is_err());
    }
}
