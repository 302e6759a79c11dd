//! # Loudly
//!
//! Succinct trie dictionary for Rust.
//!
//! This crate provides a static ordered-string dictionary encoded as a LOUDS
//! (Level-Order Unary Degree Sequence) bit string. The trie topology lives in
//! a rank/select bit vector instead of node pointers, and single-child suffix
//! chains are collapsed into a separately stored tail table, bringing the
//! space used close to the information-theoretic minimum while keeping
//! lookups fast.
//!
//! ## Module Organization
//!
//! - [`bits`] - Bitvector with O(1) rank and sampled select
//! - [`trie`] - LOUDS trie: build, search, decode
//! - [`binary`] - Binary serialization utilities
//! - [`io`] - File/stream persistence (requires `std`)
//!
//! ## Quick Start
//!
//! ```
//! use loudly::Trie;
//!
//! let trie = Trie::from_keys(&["a", "an", "and", "ant", "bat"]);
//!
//! // Longest key that is a prefix of the query
//! let m = trie.prefix_search(b"antelope").unwrap();
//! assert_eq!(trie.decode(m.id).unwrap(), b"ant");
//! assert_eq!(m.len, 3);
//!
//! // All completions of "an"
//! let ids = trie.predictive_search(b"an");
//! assert_eq!(ids.len(), 3);
//! ```
//!
//! ## Features
//!
//! - `std` (default) - Enables file-based save/load in [`io`]
//! - `serde` - Enable serialization/deserialization for config types

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Core modules (organized by category)
// =============================================================================

/// Bitvector implementations with rank and select support.
pub mod bits;

/// LOUDS trie dictionary: build, search, decode.
pub mod trie;

/// Internal utilities (not part of public API).
pub(crate) mod util;

/// Binary serialization utilities.
pub mod binary;

/// File and stream persistence.
#[cfg(feature = "std")]
pub mod io;

// =============================================================================
// Public re-exports (convenience)
// =============================================================================

// Core types
pub use bits::{BitBuf, BitVec, IntVec};
pub use util::select_in_word;

// Trie types
pub use trie::{KeyId, PrefixMatch, TailMode, Trie, TrieConfig, TrieStat};

#[cfg(feature = "std")]
pub use io::StoreError;

// =============================================================================
// Core traits
// =============================================================================

/// Trait for rank/select operations on bitvectors.
///
/// Rank and select are fundamental operations for succinct data structures:
/// - `rank1(i)`: Count 1-bits in positions `[0, i)`
/// - `select1(k)`: Find position of the k-th 1-bit (0-indexed)
///
/// LOUDS navigation needs the zero side as well, so both sides are part of
/// the trait.
pub trait RankSelect {
    /// Count 1-bits in positions `[0, i)`.
    ///
    /// Returns 0 if `i == 0`.
    fn rank1(&self, i: usize) -> usize;

    /// Count 0-bits in positions `[0, i)`.
    ///
    /// Default implementation: `i - rank1(i)`
    #[inline]
    fn rank0(&self, i: usize) -> usize {
        i - self.rank1(i)
    }

    /// Find position of the k-th 1-bit (0-indexed).
    ///
    /// Returns `None` if fewer than `k+1` ones exist.
    fn select1(&self, k: usize) -> Option<usize>;

    /// Find position of the k-th 0-bit (0-indexed).
    ///
    /// Returns `None` if fewer than `k+1` zeros exist.
    fn select0(&self, k: usize) -> Option<usize>;
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for building rank/select indices.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Sample rate for select acceleration (default: 256)
    pub select_sample_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            select_sample_rate: 256,
        }
    }
}
