//! DJB2 string hashing.
//!
//! Starts from 5381 and folds every character in with `h = h * 33 + c`,
//! where `c` is the character's Unicode scalar value. Arithmetic wraps at
//! 64 bits, so the digest for a key is stable across calls and builds.

const SEED: u64 = 5381;
const MULTIPLIER: u64 = 33;

pub fn djb2(key: &str) -> u64 {
    key.chars().fold(SEED, |h, c| {
        h.wrapping_mul(MULTIPLIER).wrapping_add(u64::from(c))
    })
}

/// Maps `key` onto a bucket in `[0, capacity)`.
///
/// `capacity` must be non-zero.
// the remainder is < capacity, so it always fits back into usize
#[allow(clippy::cast_possible_truncation)]
pub fn bucket_index(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (djb2(key) % capacity as u64) as usize
}
