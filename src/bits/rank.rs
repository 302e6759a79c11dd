//! Compact two-level rank directory for O(1) rank queries.
//!
//! Provides ~3.5% space overhead vs 50% for the naive `Vec<u32>` cumulative
//! popcount approach. Every bitvector in a LOUDS trie (topology, terminal
//! flags, tail flags) carries one of these.
//!
//! # Structure
//!
//! - **L1**: Absolute cumulative rank every 128 words (8192 bits).
//!   One `u32` per superblock → 0.39% overhead.
//! - **L2**: Relative cumulative rank every 8 words (512 bits).
//!   One `u16` per block → 3.125% overhead.
//!
//! Total: ~3.5% overhead relative to the bitmap.
//!
//! # Query
//!
//! `rank1(words, i)` = `l1[w / 128] + l2[w / 8]` + popcount of the block
//! words before `i` — two array lookups plus at most eight popcounts.

#[cfg(not(test))]
use alloc::vec::Vec;

/// Words per L1 superblock.
const L1_WORDS: usize = 128;

/// Words per L2 block.
const L2_WORDS: usize = 8;

/// Compact two-level rank directory.
///
/// Stores cumulative popcount at two granularities:
/// - L1: absolute rank per 128 words (u32, supports up to 4 billion bits)
/// - L2: relative rank per 8 words within a superblock (u16, max 8192)
///
/// The directory holds no copy of the bitmap; queries take the same `words`
/// slice the directory was built from.
#[derive(Clone, Debug)]
pub struct RankDirectory {
    /// Absolute cumulative rank at each superblock boundary.
    /// Entry i = popcount of words [0, i * 128).
    l1: Vec<u32>,
    /// Relative cumulative rank at each block boundary within its superblock.
    /// Entry j = popcount of words [superblock_start, j * 8) where
    /// superblock_start = (j / 16) * 128.
    l2: Vec<u16>,
    /// Total popcount across all words.
    total: u32,
}

impl RankDirectory {
    /// Create an empty rank directory.
    pub fn empty() -> Self {
        Self {
            l1: Vec::new(),
            l2: Vec::new(),
            total: 0,
        }
    }

    /// Build a rank directory from bitmap words.
    pub fn build(words: &[u64]) -> Self {
        if words.is_empty() {
            return Self::empty();
        }

        let num_superblocks = words.len().div_ceil(L1_WORDS);
        let num_blocks = words.len().div_ceil(L2_WORDS);

        let mut l1 = Vec::with_capacity(num_superblocks);
        let mut l2 = Vec::with_capacity(num_blocks);

        let mut absolute_rank: u32 = 0;

        for sb in 0..num_superblocks {
            l1.push(absolute_rank);

            let sb_start = sb * L1_WORDS;
            let sb_end = (sb_start + L1_WORDS).min(words.len());
            let mut relative_rank: u16 = 0;

            // Blocks within this superblock
            let blocks_in_sb = (sb_end - sb_start).div_ceil(L2_WORDS);
            for b in 0..blocks_in_sb {
                l2.push(relative_rank);

                let block_start = sb_start + b * L2_WORDS;
                let block_end = (block_start + L2_WORDS).min(sb_end);
                for &word in &words[block_start..block_end] {
                    let ones = word.count_ones() as u16;
                    relative_rank += ones;
                    absolute_rank += ones as u32;
                }
            }
        }

        Self {
            l1,
            l2,
            total: absolute_rank,
        }
    }

    /// Total number of 1-bits in the indexed bitmap.
    #[inline]
    pub fn total_ones(&self) -> usize {
        self.total as usize
    }

    /// Count 1-bits in bit positions `[0, i)`.
    ///
    /// The `words` parameter must be the same bitmap data passed to `build()`.
    /// Positions at or past the end of `words` return the total popcount.
    #[inline]
    pub fn rank1(&self, words: &[u64], i: usize) -> usize {
        let word_idx = i / 64;
        let bit_idx = i % 64;

        let mut count = self.rank_at_word(words, word_idx);
        if word_idx < words.len() && bit_idx != 0 {
            count += (words[word_idx] & ((1u64 << bit_idx) - 1)).count_ones() as usize;
        }
        count
    }

    /// Get the cumulative rank at the start of the given word index.
    ///
    /// Returns the number of 1-bits in `words[0..word_idx]`.
    /// If `word_idx` exceeds the number of words, returns the total popcount.
    #[inline]
    pub fn rank_at_word(&self, words: &[u64], word_idx: usize) -> usize {
        if self.l1.is_empty() {
            return 0;
        }

        // Boundary case: at or past the end
        if word_idx >= words.len() {
            return self.total as usize;
        }

        let sb_idx = word_idx / L1_WORDS;
        let block_idx = word_idx / L2_WORDS;

        let mut count = self.l1[sb_idx] as usize + self.l2[block_idx] as usize;

        // Add popcount for words within the block up to word_idx
        let block_start = block_idx * L2_WORDS;
        for &word in &words[block_start..word_idx] {
            count += word.count_ones() as usize;
        }

        count
    }

    /// Returns the heap memory usage in bytes.
    pub fn heap_size(&self) -> usize {
        self.l1.len() * 4 + self.l2.len() * 2
    }
}
