//! Placement configuration.
//!
//! All values are owned by the caller. Every participant that places names
//! must use identical values, otherwise the same name maps to different
//! shards or directories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PlacementError, Result};
use crate::layout::DirectoryLayout;
use crate::shard::validate_total_shards;

/// Parameters for shard and directory placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Filesystem prefix that shard directories live under.
    pub root_path: PathBuf,
    /// Total number of shards. Must not change while data is stored.
    pub total_shards: u32,
    /// Directory levels below the shard directory.
    pub depth: usize,
    /// Approximate fan-out limit per directory level.
    pub max_folders_per_level: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("data"),
            total_shards: 1000,
            depth: 2,
            max_folders_per_level: 10_000,
        }
    }
}

impl PlacementConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed or validated.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| PlacementError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can place names.
    ///
    /// Layouts whose trailing levels are truncated are accepted with a
    /// warning, since existing data may already live under them.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidParameter`] for a zero shard count or
    /// fan-out limit.
    pub fn validate(&self) -> Result<()> {
        validate_total_shards(self.total_shards)?;
        let layout = self.layout()?;
        if layout.is_truncated() {
            warn!(
                depth = layout.depth(),
                chars_per_level = layout.chars_per_level(),
                "Directory layout exceeds the 64-bit digest; trailing levels are shortened or dropped"
            );
        }
        Ok(())
    }

    /// The directory layout described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidParameter`] if
    /// `max_folders_per_level` is zero.
    pub fn layout(&self) -> Result<DirectoryLayout> {
        DirectoryLayout::new(self.depth, self.max_folders_per_level)
    }
}
