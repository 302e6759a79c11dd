//! Trie construction: explicit arena trie, BFS LOUDS linearization, tail
//! compression.
//!
//! Construction runs in three passes:
//!
//! 1. An explicit arena trie (index-based, no heap pointers) is built from
//!    the sorted, deduplicated key set.
//! 2. A breadth-first pass linearizes it into the LOUDS bit string, edge
//!    array, and terminal flags. Nodes heading a single-child, terminal-free
//!    chain that ends at a terminal leaf are emitted as tail leaves instead;
//!    the chain labels go to the tail list.
//! 3. The tail list is deduplicated into the side table, flat or nested.

#[cfg(not(test))]
use alloc::vec::Vec;

use alloc::boxed::Box;
use alloc::collections::VecDeque;

use crate::bits::{BitBuf, IntVec};
use crate::trie::tail::TailStore;
use crate::trie::{TailMode, Trie, TrieConfig};

/// A node of the throwaway build-time trie.
struct ArenaNode {
    label: u8,
    terminal: bool,
    children: Vec<u32>,
}

/// Build an immutable trie from the given keys.
///
/// Keys are canonicalized (sorted, deduplicated) here; LOUDS linearization
/// relies on a consistent sibling order.
pub(crate) fn build(mut keys: Vec<&[u8]>, config: &TrieConfig) -> Trie {
    keys.sort_unstable();
    keys.dedup();

    let arena = build_arena(&keys);
    linearize(&arena, keys.len(), config)
}

fn build_arena(keys: &[&[u8]]) -> Vec<ArenaNode> {
    let mut arena = Vec::with_capacity(keys.len() + 1);
    arena.push(ArenaNode {
        label: 0,
        terminal: false,
        children: Vec::new(),
    });

    for key in keys {
        let mut cur = 0usize;
        for &b in *key {
            // Sorted input: a matching sibling is always the most recent one.
            let existing = arena[cur]
                .children
                .last()
                .copied()
                .filter(|&c| arena[c as usize].label == b);
            cur = match existing {
                Some(c) => c as usize,
                None => {
                    let id = arena.len() as u32;
                    arena.push(ArenaNode {
                        label: b,
                        terminal: false,
                        children: Vec::new(),
                    });
                    arena[cur].children.push(id);
                    id as usize
                }
            };
        }
        arena[cur].terminal = true;
    }

    arena
}

/// The collapsed suffix below `v`, if `v` heads a collapsible chain.
///
/// `v` collapses when it is non-terminal with exactly one child and its
/// descendants form a single-child, terminal-free chain ending at a terminal
/// leaf. The returned string is the concatenated chain labels.
fn chain_tail(arena: &[ArenaNode], v: usize) -> Option<Vec<u8>> {
    if arena[v].terminal || arena[v].children.len() != 1 {
        return None;
    }
    let mut tail = Vec::new();
    let mut cur = v;
    loop {
        let child = arena[cur].children[0] as usize;
        tail.push(arena[child].label);
        if arena[child].terminal {
            return if arena[child].children.is_empty() {
                Some(tail)
            } else {
                None
            };
        }
        if arena[child].children.len() != 1 {
            return None;
        }
        cur = child;
    }
}

fn linearize(arena: &[ArenaNode], num_keys: usize, config: &TrieConfig) -> Trie {
    let mut louds = BitBuf::with_capacity(arena.len() * 2 + 2);
    let mut terminal = BitBuf::with_capacity(arena.len());
    let mut tail = BitBuf::with_capacity(arena.len());
    let mut edges = Vec::new();
    let mut raw_tails: Vec<Vec<u8>> = Vec::new();

    // Super-root: "10"
    louds.push(true);
    louds.push(false);

    let mut queue = VecDeque::new();
    queue.push_back(0usize);

    while let Some(v) = queue.pop_front() {
        if let Some(t) = chain_tail(arena, v) {
            // Collapsed: emit as a terminal tail leaf, drop the chain nodes.
            terminal.push(true);
            tail.push(true);
            raw_tails.push(t);
            louds.push(false);
            continue;
        }

        terminal.push(arena[v].terminal);
        tail.push(false);
        for &c in &arena[v].children {
            louds.push(true);
            edges.push(arena[c as usize].label);
            queue.push_back(c as usize);
        }
        louds.push(false);
    }

    let (tail_ids, tails) = build_tail_store(&raw_tails, config);

    let bit_config = config.bit_config();
    Trie {
        louds: louds.freeze_with_config(&bit_config),
        terminal: terminal.freeze_with_config(&bit_config),
        tail: tail.freeze_with_config(&bit_config),
        edges,
        tail_ids,
        tails,
        num_keys,
    }
}

/// Deduplicate the per-node tail strings into the side table and pack the
/// per-node references at fixed width.
fn build_tail_store(raw_tails: &[Vec<u8>], config: &TrieConfig) -> (IntVec, TailStore) {
    match config.tail_mode {
        TailMode::Flat => {
            let mut table = raw_tails.to_vec();
            table.sort_unstable();
            table.dedup();

            let width = IntVec::bits_for(table.len().saturating_sub(1) as u64);
            let ids: Vec<u64> = raw_tails
                .iter()
                .map(|t| {
                    table
                        .binary_search(t)
                        .expect("tail is present in its own table") as u64
                })
                .collect();
            (IntVec::pack(&ids, width), TailStore::Flat(table))
        }
        TailMode::Nested => {
            let reversed: Vec<Vec<u8>> = raw_tails
                .iter()
                .map(|t| {
                    let mut r = t.clone();
                    r.reverse();
                    r
                })
                .collect();

            let inner_config = TrieConfig {
                tail_mode: TailMode::Flat,
                select_sample_rate: config.select_sample_rate,
            };
            let nested = build(reversed.iter().map(|r| r.as_slice()).collect(), &inner_config);

            let width = IntVec::bits_for(nested.num_keys().saturating_sub(1) as u64);
            let ids: Vec<u64> = reversed
                .iter()
                .map(|r| {
                    let m = nested
                        .prefix_search(r)
                        .expect("reversed tail is a key of the nested trie");
                    debug_assert_eq!(m.len, r.len());
                    m.id as u64
                })
                .collect();
            (IntVec::pack(&ids, width), TailStore::Nested(Box::new(nested)))
        }
    }
}
