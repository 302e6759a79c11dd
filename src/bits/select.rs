//! Sampled select index over a bitmap.
//!
//! Stores the position of every `rate`-th target bit (ones or zeros). A
//! query jumps to the nearest sample at or below the requested rank and
//! finishes with a bounded word scan plus a [`select_in_word`] table lookup,
//! so no query ever degrades to a scan over the whole bitmap.
//!
//! Space: one `u32` per `rate` target bits (~0.4% overhead at the default
//! rate of 256).

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::util::select_in_word;

/// Sampled select index for one polarity (ones or zeros) of a bitmap.
///
/// The index holds no copy of the bitmap; queries take the same `words`
/// slice and logical bit length the index was built from. Zero-side queries
/// mask the padding bits of the final partial word so storage padding never
/// counts as real zeros.
#[derive(Clone, Debug)]
pub struct SelectIndex {
    /// Bit position of every `rate`-th target bit.
    samples: Vec<u32>,
    /// Sampling rate (target bits per sample).
    rate: u32,
    /// Total number of target bits in `[0, len)`.
    count: usize,
    /// True when the target bits are ones, false for zeros.
    ones: bool,
}

impl SelectIndex {
    /// Build a select index over the 1-bits of the bitmap.
    pub fn build_ones(words: &[u64], len: usize, rate: u32) -> Self {
        Self::build(words, len, rate, true)
    }

    /// Build a select index over the 0-bits of the bitmap.
    pub fn build_zeros(words: &[u64], len: usize, rate: u32) -> Self {
        Self::build(words, len, rate, false)
    }

    fn build(words: &[u64], len: usize, rate: u32, ones: bool) -> Self {
        let rate = rate.max(1);
        let mut samples = Vec::new();
        let mut count = 0usize;

        for w in 0..words.len() {
            let mut target = target_word(words, len, w, ones);
            while target != 0 {
                let bit = target.trailing_zeros() as usize;
                if count as u64 % rate as u64 == 0 {
                    samples.push((w * 64 + bit) as u32);
                }
                count += 1;
                target &= target - 1;
            }
        }

        Self {
            samples,
            rate,
            count,
            ones,
        }
    }

    /// Number of target bits in the indexed bitmap.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Find the position of the k-th target bit (0-indexed).
    ///
    /// Returns `None` when `k` is at or past the number of target bits.
    /// `words` and `len` must match the bitmap the index was built from.
    pub fn select(&self, words: &[u64], len: usize, k: usize) -> Option<usize> {
        if k >= self.count {
            return None;
        }

        let j = k / self.rate as usize;
        let sample_rank = j * self.rate as usize;
        let sample_pos = self.samples[j] as usize;

        let mut w = sample_pos / 64;
        let in_word = sample_pos % 64;

        // Rank at the start of word w: the sample's rank minus the target
        // bits of word w that sit below the sampled position.
        let below = target_word(words, len, w, self.ones) & low_mask(in_word);
        let mut rank = sample_rank - below.count_ones() as usize;

        loop {
            let target = target_word(words, len, w, self.ones);
            let in_this = target.count_ones() as usize;
            if rank + in_this > k {
                let pos = w * 64 + select_in_word(target, (k - rank) as u32) as usize;
                return Some(pos);
            }
            rank += in_this;
            w += 1;
        }
    }

    /// Returns the heap memory usage in bytes.
    pub fn heap_size(&self) -> usize {
        self.samples.len() * 4
    }
}

/// The w-th word with target bits as ones, padding past `len` cleared.
#[inline]
fn target_word(words: &[u64], len: usize, w: usize, ones: bool) -> u64 {
    let mut word = if ones { words[w] } else { !words[w] };
    if (w + 1) * 64 > len {
        word &= low_mask(len - w * 64);
    }
    word
}

#[inline]
fn low_mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
