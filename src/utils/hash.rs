//! Content hashing utilities.
//!
//! - [`compute`]: fast FxHash of byte data, used to skip no-op saves
//! - [`stable_id`]: short stable identifier derived with blake3, used for
//!   session ids that must not change between runs

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Derive an 8-byte identifier from byte data.
///
/// FxHash is not stable across releases, so anything persisted on disk
/// (work directory names) is keyed by blake3 instead.
pub fn stable_id<T: AsRef<[u8]> + ?Sized>(data: &T) -> [u8; 8] {
    let hash = blake3::hash(data.as_ref());
    let mut id = [0u8; 8];
    id.copy_from_slice(&hash.as_bytes()[..8]);
    id
}
