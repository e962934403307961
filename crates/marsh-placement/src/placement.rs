//! Storage path composition and per-name memoization.
//!
//! The full storage path of a name is
//! `<root>/<shard identifier>/<hashed directory levels>`. The shard
//! identifier is normally the resolved [`ShardId`], but callers that group
//! shards into islands can supply their own numeric identifier.
//!
//! Two APIs are offered:
//!
//! - [`Placement::compute`] evaluates everything eagerly and returns an
//!   immutable value. Prefer it.
//! - [`Name::shard_index`] and [`Name::full_hashed_path`] compute lazily and
//!   cache the first result on the name. Later calls must pass the same
//!   parameters; different parameters fail with
//!   [`PlacementError::ParameterMismatch`] instead of returning a value
//!   computed for other inputs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::PlacementConfig;
use crate::error::{PlacementError, Result};
use crate::layout::DirectoryLayout;
use crate::name::Name;
use crate::shard::{ensure_placeable, shard_for, validate_total_shards, ShardId};

/// Cached result of [`Name::shard_index`].
#[derive(Debug, Clone)]
pub(crate) struct ShardMemo {
    total_shards: u32,
    shard: ShardId,
}

/// Parameters a storage path was composed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathParams {
    root: PathBuf,
    shard_identifier: u64,
    layout: DirectoryLayout,
}

impl fmt::Display for PathParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "root={}, shard={}, depth={}, max_folders_per_level={}",
            self.root.display(),
            self.shard_identifier,
            self.layout.depth(),
            self.layout.max_folders_per_level()
        )
    }
}

/// Cached result of [`Name::full_hashed_path`].
#[derive(Debug, Clone)]
pub(crate) struct PathMemo {
    params: PathParams,
    path: PathBuf,
}

/// Compose the storage path of `name` under `root/<shard_identifier>`.
///
/// # Errors
///
/// Returns [`PlacementError::NotPlaceable`] if `name` is a pattern.
pub fn compose_path(
    name: &Name,
    root: impl AsRef<Path>,
    shard_identifier: impl Into<u64>,
    layout: &DirectoryLayout,
) -> Result<PathBuf> {
    ensure_placeable(name)?;
    Ok(join_path(name, root.as_ref(), shard_identifier.into(), layout))
}

fn join_path(name: &Name, root: &Path, shard_identifier: u64, layout: &DirectoryLayout) -> PathBuf {
    root.join(shard_identifier.to_string()).join(layout.directory_path(name.canonical_path()))
}

impl Name {
    /// Resolve and cache the shard that owns this name.
    ///
    /// The first successful call fixes the result for the lifetime of this
    /// value. Concurrent first calls compute it exactly once.
    ///
    /// # Errors
    ///
    /// - [`PlacementError::InvalidParameter`] if `total_shards` is zero.
    /// - [`PlacementError::NotPlaceable`] if this name is a pattern.
    /// - [`PlacementError::ParameterMismatch`] if the cached shard was
    ///   computed for a different `total_shards`.
    pub fn shard_index(&self, total_shards: u32) -> Result<ShardId> {
        validate_total_shards(total_shards)?;
        ensure_placeable(self)?;

        let memo = self.shard_memo.get_or_init(|| {
            let shard = shard_for(self, total_shards);
            trace!(name = %self, total_shards, %shard, "Cached shard index");
            ShardMemo { total_shards, shard }
        });

        if memo.total_shards != total_shards {
            return Err(PlacementError::ParameterMismatch {
                what: "shard index",
                cached: format!("total_shards={}", memo.total_shards),
                requested: format!("total_shards={total_shards}"),
            });
        }
        Ok(memo.shard)
    }

    /// Compose and cache the full storage path of this name.
    ///
    /// `shard_identifier` is usually [`Name::shard_index`], or an island id
    /// chosen by the caller. The first successful call fixes the result for
    /// the lifetime of this value.
    ///
    /// # Errors
    ///
    /// - [`PlacementError::InvalidParameter`] if `max_folders_per_level` is
    ///   zero.
    /// - [`PlacementError::NotPlaceable`] if this name is a pattern.
    /// - [`PlacementError::ParameterMismatch`] if the cached path was
    ///   composed from different parameters.
    pub fn full_hashed_path(
        &self,
        root: impl AsRef<Path>,
        shard_identifier: impl Into<u64>,
        depth: usize,
        max_folders_per_level: u32,
    ) -> Result<&Path> {
        let params = PathParams {
            root: root.as_ref().to_path_buf(),
            shard_identifier: shard_identifier.into(),
            layout: DirectoryLayout::new(depth, max_folders_per_level)?,
        };
        ensure_placeable(self)?;

        let memo = self.path_memo.get_or_init(|| {
            let path = join_path(self, &params.root, params.shard_identifier, &params.layout);
            trace!(name = %self, path = %path.display(), "Cached storage path");
            PathMemo { params: params.clone(), path }
        });

        if memo.params != params {
            return Err(PlacementError::ParameterMismatch {
                what: "storage path",
                cached: memo.params.to_string(),
                requested: params.to_string(),
            });
        }
        Ok(&memo.path)
    }
}

/// Where a name lives: its shard and its storage path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Canonical path of the placed name.
    pub name: String,
    /// Shard that owns the name.
    pub shard: ShardId,
    /// Caller supplied identifier the path was composed under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub island: Option<u64>,
    /// Full storage path.
    pub path: PathBuf,
}

impl Placement {
    /// Compute the placement of `name`, storing it under its own shard.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or `name` is a pattern.
    pub fn compute(name: &Name, config: &PlacementConfig) -> Result<Self> {
        Self::build(name, config, None)
    }

    /// Compute the placement of `name`, storing it under `island`.
    ///
    /// The owning shard is still resolved from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or `name` is a pattern.
    pub fn with_island(name: &Name, config: &PlacementConfig, island: u64) -> Result<Self> {
        Self::build(name, config, Some(island))
    }

    fn build(name: &Name, config: &PlacementConfig, island: Option<u64>) -> Result<Self> {
        let layout = config.layout()?;
        validate_total_shards(config.total_shards)?;
        ensure_placeable(name)?;

        let shard = shard_for(name, config.total_shards);
        let identifier = island.unwrap_or_else(|| u64::from(shard));
        let path = join_path(name, &config.root_path, identifier, &layout);

        debug!(name = %name, %shard, ?island, path = %path.display(), "Computed placement");

        Ok(Self { name: name.canonical_path().to_string(), shard, island, path })
    }
}

impl Name {
    /// Compute the placement of this name without touching its cache.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or this name is a pattern.
    pub fn placement(&self, config: &PlacementConfig) -> Result<Placement> {
        Placement::compute(self, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name() -> Name {
        Name::new("users", "alice", "info").unwrap()
    }

    #[test]
    fn test_compose_path() {
        let layout = DirectoryLayout::new(2, 10_000).unwrap();
        let path = compose_path(&name(), "/srv/marsh", 473u32, &layout).unwrap();
        assert_eq!(path, Path::new("/srv/marsh/473/a214/8d7b"));
    }

    #[test]
    fn test_compose_path_with_shard_id() {
        let layout = DirectoryLayout::new(2, 10_000).unwrap();
        let name = Name::new("Sanctuary1", "RealmA", "SwampX").unwrap();
        let shard = name.shard_index(1000).unwrap();
        let path = compose_path(&name, "", shard, &layout).unwrap();
        assert_eq!(path, Path::new("600/ba22/703a"));
    }

    #[test]
    fn test_compose_path_rejects_pattern() {
        let layout = DirectoryLayout::new(2, 10_000).unwrap();
        let pattern = Name::parse_pattern("users/alice/*").unwrap();
        assert!(matches!(
            compose_path(&pattern, "/data", 1u64, &layout),
            Err(PlacementError::NotPlaceable(_))
        ));
    }

    #[test]
    fn test_shard_index_memoized() {
        let name = name();
        let first = name.shard_index(1000).unwrap();
        let second = name.shard_index(1000).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.get(), 473);
    }

    #[test]
    fn test_shard_index_mismatch() {
        let name = name();
        name.shard_index(1000).unwrap();

        let err = name.shard_index(100).unwrap_err();
        assert!(matches!(err, PlacementError::ParameterMismatch { what: "shard index", .. }));
        assert!(err.to_string().contains("total_shards=1000"));

        // The cached value is still served for the original parameters.
        assert_eq!(name.shard_index(1000).unwrap().get(), 473);
    }

    #[test]
    fn test_shard_index_invalid_call_does_not_fill_cache() {
        let name = name();
        assert!(name.shard_index(0).is_err());
        assert_eq!(name.shard_index(100).unwrap().get(), 73);
    }

    #[test]
    fn test_full_hashed_path_memoized() {
        let name = name();
        let path = name.full_hashed_path("/srv/marsh", 473u32, 2, 10_000).unwrap().to_path_buf();
        assert_eq!(path, Path::new("/srv/marsh/473/a214/8d7b"));
        assert_eq!(name.full_hashed_path("/srv/marsh", 473u32, 2, 10_000).unwrap(), path);
    }

    #[test]
    fn test_full_hashed_path_mismatch() {
        let name = name();
        name.full_hashed_path("/srv/marsh", 473u32, 2, 10_000).unwrap();

        for result in [
            name.full_hashed_path("/other", 473u32, 2, 10_000),
            name.full_hashed_path("/srv/marsh", 7u32, 2, 10_000),
            name.full_hashed_path("/srv/marsh", 473u32, 3, 10_000),
            name.full_hashed_path("/srv/marsh", 473u32, 2, 256),
        ] {
            assert!(matches!(
                result,
                Err(PlacementError::ParameterMismatch { what: "storage path", .. })
            ));
        }
    }

    #[test]
    fn test_full_hashed_path_invalid_parameters() {
        let name = name();
        assert!(matches!(
            name.full_hashed_path("/data", 1u32, 2, 0),
            Err(PlacementError::InvalidParameter { .. })
        ));
        let pattern = Name::parse_pattern("users/*/info").unwrap();
        assert!(matches!(
            pattern.full_hashed_path("/data", 1u32, 2, 10),
            Err(PlacementError::NotPlaceable(_))
        ));
    }

    #[test]
    fn test_clone_keeps_cache() {
        let name = name();
        name.shard_index(1000).unwrap();
        let cloned = name.clone();
        assert!(cloned.shard_index(100).is_err());
    }

    #[test]
    fn test_placement_compute() {
        let config = PlacementConfig {
            root_path: PathBuf::from("/srv/marsh"),
            total_shards: 1000,
            depth: 2,
            max_folders_per_level: 10_000,
        };
        let placement = Placement::compute(&name(), &config).unwrap();
        assert_eq!(placement.name, "users/alice/info");
        assert_eq!(placement.shard.get(), 473);
        assert_eq!(placement.island, None);
        assert_eq!(placement.path, Path::new("/srv/marsh/473/a214/8d7b"));

        assert_eq!(name().placement(&config).unwrap(), placement);
    }

    #[test]
    fn test_placement_with_island() {
        let config = PlacementConfig {
            root_path: PathBuf::from("/srv/marsh"),
            total_shards: 1000,
            ..Default::default()
        };
        let placement = Placement::with_island(&name(), &config, 12).unwrap();
        assert_eq!(placement.shard.get(), 473);
        assert_eq!(placement.island, Some(12));
        assert_eq!(placement.path, Path::new("/srv/marsh/12/a214/8d7b"));
    }

    #[test]
    fn test_placement_rejects_invalid_config() {
        let config = PlacementConfig { total_shards: 0, ..Default::default() };
        assert!(matches!(
            Placement::compute(&name(), &config),
            Err(PlacementError::InvalidParameter { name: "total_shards", .. })
        ));

        let config = PlacementConfig { max_folders_per_level: 0, ..Default::default() };
        assert!(Placement::compute(&name(), &config).is_err());
    }

    #[test]
    fn test_placement_serialization() {
        let config = PlacementConfig {
            root_path: PathBuf::from("/srv/marsh"),
            total_shards: 1000,
            ..Default::default()
        };
        let placement = Placement::compute(&name(), &config).unwrap();
        let json = serde_json::to_value(&placement).unwrap();
        assert_eq!(json["shard"], 473);
        assert_eq!(json["path"], "/srv/marsh/473/a214/8d7b");
        assert!(json.get("island").is_none());

        let restored: Placement = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(restored, placement);

        let mut zero_shard = json;
        zero_shard["shard"] = serde_json::json!(0);
        assert!(serde_json::from_value::<Placement>(zero_shard).is_err());
    }
}
