//! Driver configuration, loaded from an optional JSON file.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use lanewar_core::config::MatchConfig;
use lanewar_core::constants::FRAME_RATE;

/// Frame pacing and output settings plus the match to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frames per second of the game loop.
    pub frame_rate: u32,
    /// Write a snapshot line every N frames (1 = every frame).
    pub snapshot_every: u32,
    /// Stop after this many frames even if the match is still running.
    pub max_frames: Option<u64>,
    /// Stop when stdin closes.
    pub exit_on_eof: bool,
    /// Sleep between frames. When false, frames run back to back with a
    /// fixed dt of one frame period.
    pub realtime: bool,
    #[serde(rename = "match")]
    pub match_config: MatchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate: FRAME_RATE,
            snapshot_every: 1,
            max_frames: None,
            exit_on_eof: false,
            realtime: true,
            match_config: MatchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(json).context("malformed app config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("loading config {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.frame_rate > 0, "frame_rate must be positive");
        anyhow::ensure!(self.snapshot_every > 0, "snapshot_every must be positive");
        self.match_config.validate()?;
        Ok(())
    }

    /// Nominal seconds per frame.
    pub fn frame_secs(&self) -> f64 {
        1.0 / f64::from(self.frame_rate)
    }
}
