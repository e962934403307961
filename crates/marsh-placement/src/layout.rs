//! Hashed directory layout on a shard.
//!
//! The digest of a canonical path, rendered as hex, is cut into `depth`
//! fixed-width slices. Each slice names one directory level, which bounds
//! the number of entries per directory to roughly `max_folders_per_level`.
//!
//! The digest has at most [`DIGEST_HEX_WIDTH`] hex digits. When
//! `depth * chars_per_level` exceeds the rendered digest, trailing levels
//! are shorter or empty. Existing deployments store data under exactly
//! these paths, so the truncation is reproduced rather than repaired;
//! [`DirectoryLayout::is_truncated`] reports configurations that hit it.

use std::path::PathBuf;

use crate::error::{PlacementError, Result};
use crate::hash::{digest_hex, DIGEST_HEX_WIDTH};

/// Minimum number of hex digits per directory level.
pub const MIN_CHARS_PER_LEVEL: usize = 2;

/// Number of hex digits needed to render `value`.
fn hex_width(value: u64) -> usize {
    if value == 0 {
        1
    } else {
        (u64::BITS - value.leading_zeros()).div_ceil(4) as usize
    }
}

/// Validated directory layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectoryLayout {
    depth: usize,
    max_folders_per_level: u32,
    chars_per_level: usize,
}

impl DirectoryLayout {
    /// Create a layout with `depth` levels of at most roughly
    /// `max_folders_per_level` entries.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidParameter`] if `max_folders_per_level`
    /// is zero.
    pub fn new(depth: usize, max_folders_per_level: u32) -> Result<Self> {
        if max_folders_per_level == 0 {
            return Err(PlacementError::invalid_parameter(
                "max_folders_per_level",
                "must be greater than 0",
            ));
        }
        let chars_per_level =
            hex_width(u64::from(max_folders_per_level - 1)).max(MIN_CHARS_PER_LEVEL);
        Ok(Self { depth, max_folders_per_level, chars_per_level })
    }

    /// Number of directory levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Requested fan-out limit per level.
    #[must_use]
    pub fn max_folders_per_level(&self) -> u32 {
        self.max_folders_per_level
    }

    /// Hex digits per directory name.
    #[must_use]
    pub fn chars_per_level(&self) -> usize {
        self.chars_per_level
    }

    /// Returns true if some levels may be shorter than
    /// [`chars_per_level`](Self::chars_per_level) or empty.
    ///
    /// Digests below 2^60 render with fewer than 16 digits, so individual
    /// identities can be truncated even when this returns false for the
    /// last digit or two.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.depth.saturating_mul(self.chars_per_level) > DIGEST_HEX_WIDTH
    }

    /// Directory names for `identity`, exactly [`depth`](Self::depth) of
    /// them, possibly ending in short or empty names.
    #[must_use]
    pub fn segments(&self, identity: &str) -> Vec<String> {
        let hex = digest_hex(identity);
        (0..self.depth)
            .map(|level| {
                let start = level.saturating_mul(self.chars_per_level).min(hex.len());
                let end = start.saturating_add(self.chars_per_level).min(hex.len());
                hex[start..end].to_string()
            })
            .collect()
    }

    /// Relative directory path for `identity`.
    ///
    /// Empty trailing segments are skipped, so a truncated layout yields a
    /// shallower path instead of empty path components.
    #[must_use]
    pub fn directory_path(&self, identity: &str) -> PathBuf {
        self.segments(identity).into_iter().filter(|segment| !segment.is_empty()).collect()
    }
}

/// Directory names for `identity` under the given layout parameters.
///
/// # Errors
///
/// Returns [`PlacementError::InvalidParameter`] if `max_folders_per_level`
/// is zero.
pub fn hashed_directory_segments(
    identity: &str,
    depth: usize,
    max_folders_per_level: u32,
) -> Result<Vec<String>> {
    Ok(DirectoryLayout::new(depth, max_folders_per_level)?.segments(identity))
}
