//! Binary serialization utilities.
//!
//! Bitvector payloads travel as little-endian `u64` words. Writing casts the
//! word slice to bytes in place; reading copies, because bytes pulled from a
//! stream carry no alignment guarantee.

#[cfg(not(test))]
use alloc::vec::Vec;

/// View a word slice as raw bytes without copying.
#[inline]
pub fn words_to_bytes(words: &[u64]) -> &[u8] {
    bytemuck::cast_slice(words)
}

/// Convert bytes to words, copying.
///
/// # Panics
///
/// Panics if the byte length is not a multiple of 8. Use
/// [`try_bytes_to_words`] for untrusted input.
pub fn bytes_to_words_vec(bytes: &[u8]) -> Vec<u64> {
    assert!(
        bytes.len() % 8 == 0,
        "byte length must be a multiple of 8, got {}",
        bytes.len()
    );
    bytes
        .chunks_exact(8)
        .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

/// Convert bytes to words, copying.
///
/// Returns `None` if the byte length is not a multiple of 8.
pub fn try_bytes_to_words(bytes: &[u8]) -> Option<Vec<u64>> {
    if bytes.len() % 8 != 0 {
        return None;
    }
    Some(bytes_to_words_vec(bytes))
}
