//! Bitvector implementations with rank and select support.
//!
//! This module provides the succinct primitives the LOUDS trie is built on.
//!
//! # Data Structures
//!
//! - [`BitBuf`] - Append-only bit buffer used during construction
//! - [`BitVec`] - Frozen bitvector with integrated rank/select indices
//! - [`RankDirectory`] - Two-level rank index (~3.5% overhead)
//! - [`SelectIndex`] - Sampled select index, one per polarity
//! - [`IntVec`] - Fixed-width packed integer vector
//!
//! # Example
//!
//! ```
//! use loudly::bits::BitBuf;
//! use loudly::RankSelect;
//!
//! let mut buf = BitBuf::new();
//! for bit in [true, false, true, true, false] {
//!     buf.push(bit);
//! }
//! let bv = buf.freeze();
//! assert_eq!(bv.rank1(4), 3);
//! assert_eq!(bv.select1(1), Some(2));
//! assert_eq!(bv.select0(0), Some(1));
//! ```

mod bitvec;
mod intvec;
mod rank;
mod select;

pub use bitvec::{BitBuf, BitVec};
pub use intvec::IntVec;
pub use rank::RankDirectory;
pub use select::SelectIndex;
