//! Tail storage: the side table holding collapsed suffix chains.

#[cfg(not(test))]
use alloc::vec::Vec;

use alloc::borrow::Cow;
use alloc::boxed::Box;

use crate::trie::{TailMode, Trie};

/// Backing store for collapsed tail strings.
///
/// The nested variant owns a full trie of its own, built over the reversed
/// tails; resolution decodes and reverses back. One level of nesting only:
/// the inner trie always stores its tails flat.
#[derive(Clone, Debug)]
pub(crate) enum TailStore {
    Flat(Vec<Vec<u8>>),
    Nested(Box<Trie>),
}

impl TailStore {
    /// The tail string at `index` (a deduplicated-table index for flat
    /// storage, a nested key ID otherwise).
    pub(crate) fn get(&self, index: usize) -> Cow<'_, [u8]> {
        match self {
            TailStore::Flat(table) => Cow::Borrowed(&table[index]),
            TailStore::Nested(trie) => {
                let mut s = trie.decode(index as u32).unwrap_or_default();
                s.reverse();
                Cow::Owned(s)
            }
        }
    }

    /// Number of distinct tails stored.
    pub(crate) fn len(&self) -> usize {
        match self {
            TailStore::Flat(table) => table.len(),
            TailStore::Nested(trie) => trie.num_keys(),
        }
    }

    pub(crate) fn mode(&self) -> TailMode {
        match self {
            TailStore::Flat(_) => TailMode::Flat,
            TailStore::Nested(_) => TailMode::Nested,
        }
    }

    /// Returns the heap memory usage in bytes.
    pub(crate) fn heap_size(&self) -> usize {
        match self {
            TailStore::Flat(table) => table
                .iter()
                .map(|t| t.len() + core::mem::size_of::<Vec<u8>>())
                .sum(),
            TailStore::Nested(trie) => trie.heap_size(),
        }
    }
}
