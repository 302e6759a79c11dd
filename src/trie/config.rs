//! Configuration for trie construction.

use crate::Config;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Storage strategy for the tail table.
///
/// Single-child suffix chains are always collapsed out of the topology; the
/// mode picks how the collapsed strings are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TailMode {
    /// Tails live in a flat, deduplicated string table.
    Flat,
    /// Tails are re-encoded as a nested trie over the reversed strings, so
    /// shared suffixes collapse into shared prefixes.
    Nested,
}

/// Configuration for building a [`Trie`](crate::Trie).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrieConfig {
    /// Tail storage strategy (default: [`TailMode::Nested`])
    pub tail_mode: TailMode,
    /// Select sample rate for the topology bitvectors (default: 256)
    pub select_sample_rate: u32,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            tail_mode: TailMode::Nested,
            select_sample_rate: 256,
        }
    }
}

impl TrieConfig {
    /// Set the tail storage strategy.
    pub fn with_tail_mode(mut self, tail_mode: TailMode) -> Self {
        self.tail_mode = tail_mode;
        self
    }

    /// Set the select sample rate for the index.
    pub fn with_select_sample_rate(mut self, rate: u32) -> Self {
        self.select_sample_rate = rate;
        self
    }

    /// The bitvector config this trie config implies.
    pub(crate) fn bit_config(&self) -> Config {
        Config {
            select_sample_rate: self.select_sample_rate,
        }
    }
}
