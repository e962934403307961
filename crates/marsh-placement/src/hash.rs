//! Pinned hash function for placement.
//!
//! Every placement decision derives from a single 64-bit digest: xxHash64
//! with seed 0 over the raw UTF-8 bytes. Client libraries in other languages
//! compute the same digest, so this function must never change. Changing it
//! silently relocates every stored swamp.

use xxhash_rust::xxh64::{xxh64, Xxh64};

/// Seed shared by every implementation of the placement hash.
pub const PLACEMENT_HASH_SEED: u64 = 0;

/// Maximum number of hex digits a digest renders to.
pub const DIGEST_HEX_WIDTH: usize = 16;

/// Compute the placement digest of a byte string.
#[inline]
#[must_use]
pub fn digest(bytes: &[u8]) -> u64 {
    xxh64(bytes, PLACEMENT_HASH_SEED)
}

/// Compute the placement digest of the concatenation of `parts`.
///
/// Equivalent to hashing the parts joined without a separator, without
/// allocating the joined string.
#[must_use]
pub fn digest_concat<'a>(parts: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut hasher = Xxh64::new(PLACEMENT_HASH_SEED);
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hasher.digest()
}

/// Render the digest of `input` as lowercase hex.
///
/// Leading zeros are not padded, so digests below 2^60 render shorter than
/// [`DIGEST_HEX_WIDTH`]. Directory names of existing deployments depend on
/// this rendering.
#[must_use]
pub fn digest_hex(input: &str) -> String {
    format!("{:x}", digest(input.as_bytes()))
}
