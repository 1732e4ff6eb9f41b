//! # Configuration Module
//!
//! This module handles configuration management and data directory setup for Motif.
//! It provides platform-appropriate data storage locations and loads the optional
//! runtime configuration file.
//!
//! ## Data Storage
//!
//! Motif keeps its configuration in the platform-standard data directory:
//! - Linux: `~/.local/share/motif/config.json`
//! - macOS: `~/Library/Application Support/motif/config.json`
//! - Windows: `%APPDATA%\motif\config.json`
//!
//! Nothing else is written there; the index itself lives in memory only.
//!
//! ## Configuration File
//!
//! ```json
//! { "sample_stride": 3, "poll_interval_ms": 0, "report_limit": 20 }
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use crate::index::IndexConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns the platform-appropriate data directory for Motif,
/// creating it if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The motif subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    // Get platform-appropriate data directory
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        ))?;

    let motif_dir = data_dir.join("motif");
    fs::create_dir_all(&motif_dir)
        .with_context(|| format!(
            "Failed to create Motif data directory at {}. Please check file permissions.",
            motif_dir.display()
        ))?;

    Ok(motif_dir)
}

/// Path of the runtime configuration file. The file need not exist.
///
/// # Errors
///
/// Same as [`get_data_dir`].
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("config.json"))
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Mine every n-th track of each new shuffle
    pub sample_stride: usize,
    /// Pause between polls of a playback source
    pub poll_interval_ms: u64,
    /// Maximum number of patterns printed in a report
    pub report_limit: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sample_stride: IndexConfig::default().sample_stride,
            poll_interval_ms: 0,
            report_limit: 20,
        }
    }
}

impl RuntimeConfig {
    /// Load the configuration from the data directory, falling back to
    /// defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.validate()?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error for a zero sample stride.
    pub fn validate(&self) -> Result<()> {
        self.index_config()
            .validate()
            .context("Invalid sample_stride in configuration")
    }

    #[must_use]
    pub const fn index_config(&self) -> IndexConfig {
        IndexConfig { sample_stride: self.sample_stride }
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
