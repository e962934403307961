//! Shard resolution.
//!
//! A name is owned by shard `(digest mod total_shards) + 1`, where the
//! digest covers the sanctuary, realm and swamp concatenated without a
//! separator. Shard numbers are 1-based; zero never identifies a shard.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::hash::digest_concat;
use crate::name::Name;

/// A 1-based shard number in `[1, total_shards]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub struct ShardId(u32);

impl ShardId {
    /// The shard number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ShardId> for u64 {
    fn from(id: ShardId) -> Self {
        u64::from(id.0)
    }
}

impl From<ShardId> for u32 {
    fn from(id: ShardId) -> Self {
        id.0
    }
}

impl TryFrom<u32> for ShardId {
    type Error = PlacementError;

    fn try_from(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(PlacementError::invalid_parameter("shard", "shard numbers start at 1"));
        }
        Ok(Self(value))
    }
}

/// Reject shard counts that cannot own a name.
pub(crate) fn validate_total_shards(total_shards: u32) -> Result<()> {
    if total_shards == 0 {
        return Err(PlacementError::invalid_parameter("total_shards", "must be greater than 0"));
    }
    Ok(())
}

/// Reject names that are patterns.
pub(crate) fn ensure_placeable(name: &Name) -> Result<()> {
    if name.is_pattern() {
        return Err(PlacementError::NotPlaceable(name.canonical_path().to_string()));
    }
    Ok(())
}

/// Shard number for a validated name and shard count.
pub(crate) fn shard_for(name: &Name, total_shards: u32) -> ShardId {
    let digest = digest_concat([name.sanctuary_id(), name.realm_name(), name.swamp_name()]);
    // The remainder is below total_shards, so it fits in u32 and +1 cannot overflow.
    ShardId((digest % u64::from(total_shards)) as u32 + 1)
}

/// Resolve the shard that owns `name`.
///
/// # Errors
///
/// Returns [`PlacementError::InvalidParameter`] if `total_shards` is zero and
/// [`PlacementError::NotPlaceable`] if `name` is a pattern.
pub fn resolve_shard(name: &Name, total_shards: u32) -> Result<ShardId> {
    validate_total_shards(total_shards)?;
    ensure_placeable(name)?;
    Ok(shard_for(name, total_shards))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_shard_reference_values() {
        let name = Name::new("users", "alice", "info").unwrap();
        assert_eq!(resolve_shard(&name, 1000).unwrap(), ShardId(473));
        assert_eq!(resolve_shard(&name, 100).unwrap(), ShardId(73));

        let name = Name::new("Sanctuary1", "RealmA", "SwampX").unwrap();
        assert_eq!(resolve_shard(&name, 1000).unwrap().get(), 600);
        assert_eq!(resolve_shard(&name, 100).unwrap().get(), 100);
    }

    #[test]
    fn test_resolve_shard_single_shard() {
        let name = Name::new("users", "alice", "info").unwrap();
        assert_eq!(resolve_shard(&name, 1).unwrap().get(), 1);
    }

    #[test]
    fn test_resolve_shard_range() {
        for total in [1, 2, 7, 100, 1000, u32::MAX] {
            for i in 0..200 {
                let name = Name::new("sanctuary", "realm", format!("swamp-{i}")).unwrap();
                let shard = resolve_shard(&name, total).unwrap().get();
                assert!((1..=total).contains(&shard), "shard {shard} out of range for {total}");
            }
        }
    }

    #[test]
    fn test_resolve_shard_zero_total() {
        let name = Name::new("users", "alice", "info").unwrap();
        let err = resolve_shard(&name, 0).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidParameter { name: "total_shards", .. }));
    }

    #[test]
    fn test_resolve_shard_pattern() {
        let pattern = Name::parse_pattern("users/*/info").unwrap();
        let err = resolve_shard(&pattern, 10).unwrap_err();
        assert!(matches!(err, PlacementError::NotPlaceable(_)));
    }

    #[test]
    fn test_shard_key_has_no_separator() {
        // "ab/c/d" and "a/bc/d" concatenate to the same shard key.
        let a = Name::new("ab", "c", "d").unwrap();
        let b = Name::new("a", "bc", "d").unwrap();
        assert_eq!(resolve_shard(&a, 1000).unwrap(), resolve_shard(&b, 1000).unwrap());
    }

    #[test]
    fn test_shard_id_display_and_conversion() {
        let id = ShardId(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(u64::from(id), 42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_shard_id_rejects_zero() {
        assert!(matches!(
            ShardId::try_from(0),
            Err(PlacementError::InvalidParameter { name: "shard", .. })
        ));
        assert_eq!(ShardId::try_from(7).unwrap().get(), 7);

        assert_eq!(serde_json::from_str::<ShardId>("42").unwrap(), ShardId(42));
        assert!(serde_json::from_str::<ShardId>("0").is_err());
    }
}
