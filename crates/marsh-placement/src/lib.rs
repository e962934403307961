//! Deterministic placement of `sanctuary/realm/swamp` names.
//!
//! Every stored swamp is owned by one of a fixed number of shards and lives
//! in a nested, fan-out bounded directory on that shard. Both are derived
//! from the name alone using a pinned hash, so any client library that
//! implements the same rules finds the same data without a coordinator.
//!
//! # Overview
//!
//! ```text
//!   users/alice/info
//!         │
//!         ├── xxh64("usersaliceinfo") mod 1000 + 1 ──────────► shard 473
//!         │
//!         └── xxh64("users/alice/info") = a2148d7b577e9c46
//!                                          ├──┘├──┘
//!                                          a214 8d7b ─────────► /data/473/a214/8d7b
//! ```
//!
//! # Usage
//!
//! ```
//! use marsh_placement::{Name, Placement, PlacementConfig};
//!
//! let name = Name::empty()
//!     .sanctuary("users")?
//!     .realm("alice")?
//!     .swamp("info")?;
//!
//! let config = PlacementConfig {
//!     root_path: "/data".into(),
//!     total_shards: 1000,
//!     depth: 2,
//!     max_folders_per_level: 10_000,
//! };
//!
//! let placement = Placement::compute(&name, &config)?;
//! assert_eq!(placement.shard.get(), 473);
//! assert_eq!(placement.path, std::path::Path::new("/data/473/a214/8d7b"));
//!
//! // Wildcard patterns select names but are never placed.
//! let filter = Name::parse_pattern("users/*/info")?;
//! assert!(name.matches(&filter));
//! assert!(Placement::compute(&filter, &config).is_err());
//! # Ok::<(), marsh_placement::PlacementError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod layout;
pub mod name;
mod pattern;
pub mod placement;
pub mod shard;

pub use config::PlacementConfig;
pub use error::{PlacementError, Result};
pub use hash::{digest, digest_hex};
pub use layout::{hashed_directory_segments, DirectoryLayout};
pub use name::{Level, Name, NameBuilder, Segment};
pub use placement::{compose_path, Placement};
pub use shard::{resolve_shard, ShardId};
