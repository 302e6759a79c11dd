//! The immutable LOUDS trie: navigation, searches, decode, statistics.

#[cfg(not(test))]
use alloc::vec::Vec;

use alloc::borrow::Cow;

use crate::bits::{BitVec, IntVec};
use crate::trie::tail::TailStore;
use crate::trie::{builder, TailMode, TrieConfig};
use crate::RankSelect;

/// Dense identifier of an indexed key, in `[0, num_keys)`.
pub type KeyId = u32;

/// Result of a successful [`Trie::prefix_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    /// ID of the matched key.
    pub id: KeyId,
    /// Byte length of the matched key.
    pub len: usize,
}

/// A succinct, immutable trie dictionary.
///
/// The topology is a LOUDS bit string: a `10` super-root, then per node in
/// breadth-first order one `1` per child followed by a `0` terminator. A
/// node is the k-th `1` bit; its child list sits between the k-th and
/// (k+1)-th `0`, so all navigation reduces to rank/select arithmetic over
/// [`BitVec`] — no pointers are stored anywhere.
///
/// Terminal and tail flags are parallel bitvectors indexed by node rank.
/// Key IDs are terminal ranks: the i-th terminal node in LOUDS order holds
/// key `i`.
#[derive(Clone, Debug)]
pub struct Trie {
    /// LOUDS topology bits.
    pub(crate) louds: BitVec,
    /// Per-node flag: a key ends at this node.
    pub(crate) terminal: BitVec,
    /// Per-node flag: this node carries a collapsed suffix.
    pub(crate) tail: BitVec,
    /// Edge label of node k at `edges[k - 1]`, breadth-first order.
    pub(crate) edges: Vec<u8>,
    /// Per-tail-node reference into the tail store, fixed-width packed.
    pub(crate) tail_ids: IntVec,
    /// Deduplicated tail strings, flat or nested.
    pub(crate) tails: TailStore,
    /// Number of indexed keys.
    pub(crate) num_keys: usize,
}

/// Where a root-to-node walk along a query stopped.
enum Walk {
    /// The query was consumed at a live trie node.
    Exhausted { node: usize },
    /// A tail leaf was reached with `depth` query bytes consumed.
    Tail { node: usize, depth: usize },
    /// No child matched, or the terminal callback asked to stop.
    Done,
}

impl Trie {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Build a trie from a key set.
    ///
    /// Keys are opaque byte strings; they are sorted and deduplicated before
    /// linearization, so input order only matters to callers keeping their
    /// own side tables (use [`Trie::decode`] to recover keys by ID instead).
    pub fn build<K: AsRef<[u8]>>(keys: &[K], config: &TrieConfig) -> Self {
        builder::build(keys.iter().map(|k| k.as_ref()).collect(), config)
    }

    /// Build a trie with the default configuration (nested tails).
    pub fn from_keys<K: AsRef<[u8]>>(keys: &[K]) -> Self {
        Self::build(keys, &TrieConfig::default())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of keys in the dictionary.
    #[inline]
    pub fn num_keys(&self) -> usize {
        self.num_keys
    }

    /// Number of nodes in the LOUDS topology (including the root).
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.louds.count_ones()
    }

    /// Number of nodes carrying a collapsed tail.
    #[inline]
    pub fn num_tails(&self) -> usize {
        self.tail.count_ones()
    }

    /// Tail storage strategy this trie was built with.
    #[inline]
    pub fn tail_mode(&self) -> TailMode {
        self.tails.mode()
    }

    /// Returns the heap memory usage in bytes.
    pub fn heap_size(&self) -> usize {
        self.louds.heap_size()
            + self.terminal.heap_size()
            + self.tail.heap_size()
            + self.edges.len()
            + self.tail_ids.heap_size()
            + self.tails.heap_size()
    }

    // =========================================================================
    // Navigation (rank/select arithmetic only)
    // =========================================================================

    /// The child of `node` along edge byte `c`.
    ///
    /// Child IDs of a node are consecutive, so the edge labels of its child
    /// range form a contiguous slice scanned directly.
    fn child(&self, node: usize, c: u8) -> Option<usize> {
        let start = self.louds.select0(node)? + 1;
        let end = self.louds.select0(node + 1)?;
        let first_child = start - (node + 1);
        let labels = &self.edges[first_child - 1..first_child - 1 + (end - start)];
        labels
            .iter()
            .position(|&l| l == c)
            .map(|j| first_child + j)
    }

    /// The parent of `node` and the edge byte consumed to reach `node`.
    ///
    /// Inverse of [`Self::child`], via select on the entry bit: the zeros
    /// before a node's entry position count its parent's terminator.
    fn parent(&self, node: usize) -> Option<(usize, u8)> {
        if node == 0 {
            return None;
        }
        let pos = self.louds.select1(node)?;
        Some((self.louds.rank0(pos) - 1, self.edges[node - 1]))
    }

    /// True iff `node` has no LOUDS children.
    #[allow(dead_code)]
    fn is_leaf(&self, node: usize) -> bool {
        match self.louds.select0(node) {
            Some(z) => !self.louds.get(z + 1),
            None => true,
        }
    }

    /// Key ID of a terminal node: its terminal rank.
    #[inline]
    fn id_at(&self, node: usize) -> KeyId {
        self.terminal.rank1(node) as KeyId
    }

    /// The collapsed suffix stored at a tail node.
    fn tail_at(&self, node: usize) -> Cow<'_, [u8]> {
        let tail_rank = self.tail.rank1(node);
        self.tails.get(self.tail_ids.get(tail_rank) as usize)
    }

    // =========================================================================
    // Searches
    // =========================================================================

    /// Walk from the root consuming query bytes, reporting every terminal
    /// node passed (with its depth) to `on_terminal`. Stops at a tail leaf,
    /// at query exhaustion, at a mismatch, or when the callback returns
    /// false.
    fn walk<F: FnMut(KeyId, usize) -> bool>(&self, query: &[u8], mut on_terminal: F) -> Walk {
        let mut node = 0usize;
        let mut depth = 0usize;
        loop {
            if self.tail.get(node) {
                return Walk::Tail { node, depth };
            }
            if self.terminal.get(node) && !on_terminal(self.id_at(node), depth) {
                return Walk::Done;
            }
            if depth == query.len() {
                return Walk::Exhausted { node };
            }
            match self.child(node, query[depth]) {
                Some(c) => {
                    node = c;
                    depth += 1;
                }
                None => return Walk::Done,
            }
        }
    }

    /// Find the longest key that is a prefix of `query`.
    ///
    /// Returns the matched key's ID and length, or `None` when no key
    /// (including the empty key, if indexed) is a prefix of `query`.
    pub fn prefix_search(&self, query: &[u8]) -> Option<PrefixMatch> {
        let mut best = None;
        let walk = self.walk(query, |id, len| {
            best = Some(PrefixMatch { id, len });
            true
        });
        if let Walk::Tail { node, depth } = walk {
            let tail = self.tail_at(node);
            if query[depth..].starts_with(&tail) {
                best = Some(PrefixMatch {
                    id: self.id_at(node),
                    len: depth + tail.len(),
                });
            }
        }
        best
    }

    /// Find every key that is a prefix of `query`, ordered by increasing
    /// length.
    pub fn common_prefix_search(&self, query: &[u8]) -> Vec<KeyId> {
        self.common_prefix_search_with_limit(query, usize::MAX)
    }

    /// [`Self::common_prefix_search`] returning at most `limit` IDs.
    pub fn common_prefix_search_with_limit(&self, query: &[u8], limit: usize) -> Vec<KeyId> {
        let mut ids = Vec::new();
        if limit == 0 {
            return ids;
        }
        let walk = self.walk(query, |id, _| {
            ids.push(id);
            ids.len() < limit
        });
        if ids.len() < limit {
            if let Walk::Tail { node, depth } = walk {
                let tail = self.tail_at(node);
                if query[depth..].starts_with(&tail) {
                    ids.push(self.id_at(node));
                }
            }
        }
        ids
    }

    /// Find every key of which `query` is a prefix (all completions).
    pub fn predictive_search(&self, query: &[u8]) -> Vec<KeyId> {
        self.predictive_search_with_limit(query, usize::MAX)
    }

    /// [`Self::predictive_search`] returning at most `limit` IDs.
    pub fn predictive_search_with_limit(&self, query: &[u8], limit: usize) -> Vec<KeyId> {
        let mut ids = Vec::new();
        if limit == 0 {
            return ids;
        }
        match self.walk(query, |_, _| true) {
            Walk::Exhausted { node } => {
                self.enumerate(node, &mut ids, limit);
            }
            Walk::Tail { node, depth } => {
                // The remaining query must sit inside the stored tail; the
                // tail leaf is then the sole completion.
                let tail = self.tail_at(node);
                if tail.starts_with(&query[depth..]) {
                    ids.push(self.id_at(node));
                }
            }
            Walk::Done => {}
        }
        ids
    }

    /// Depth-first subtree enumeration in LOUDS child order, terminal nodes
    /// before their descendants. Returns false once `limit` is reached.
    fn enumerate(&self, node: usize, ids: &mut Vec<KeyId>, limit: usize) -> bool {
        if self.terminal.get(node) {
            ids.push(self.id_at(node));
            if ids.len() >= limit {
                return false;
            }
        }
        let Some(start) = self.louds.select0(node) else {
            return true;
        };
        let first_child = start + 1 - (node + 1);
        let mut pos = start + 1;
        let mut j = 0;
        while self.louds.get(pos) {
            if !self.enumerate(first_child + j, ids, limit) {
                return false;
            }
            pos += 1;
            j += 1;
        }
        true
    }

    // =========================================================================
    // Decode
    // =========================================================================

    /// Recover the key bytes for `id`.
    ///
    /// Returns `None` for an unknown ID; an unsuccessful decode is a normal
    /// outcome, not a failure.
    pub fn decode(&self, id: KeyId) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        if self.decode_into(id, &mut out) {
            Some(out)
        } else {
            None
        }
    }

    /// Recover the key bytes for `id` into `out`, reusing its allocation.
    ///
    /// Returns false (leaving `out` empty) for an unknown ID.
    pub fn decode_into(&self, id: KeyId, out: &mut Vec<u8>) -> bool {
        out.clear();
        if id as usize >= self.num_keys {
            return false;
        }
        let Some(mut node) = self.terminal.select1(id as usize) else {
            return false;
        };
        let origin = node;

        while let Some((up, label)) = self.parent(node) {
            out.push(label);
            node = up;
        }
        out.reverse();

        if self.tail.get(origin) {
            out.extend_from_slice(&self.tail_at(origin));
        }
        true
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Build a space report for this trie against the raw key set.
    ///
    /// Purely informational; not part of the functional contract.
    pub fn stat<K: AsRef<[u8]>>(&self, keys: &[K]) -> TrieStat {
        let raw_key_bytes = keys.iter().map(|k| k.as_ref().len()).sum();
        TrieStat {
            num_keys: self.num_keys,
            num_nodes: self.num_nodes(),
            num_tails: self.num_tails(),
            distinct_tails: self.tails.len(),
            tail_mode: self.tail_mode(),
            raw_key_bytes,
            louds_bits: self.louds.len(),
            edge_bytes: self.edges.len(),
            tail_id_bits: self.tail_ids.len() * self.tail_ids.width() as usize,
            heap_bytes: self.heap_size(),
        }
    }
}

/// Space diagnostics produced by [`Trie::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieStat {
    /// Keys in the dictionary.
    pub num_keys: usize,
    /// Nodes in the LOUDS topology.
    pub num_nodes: usize,
    /// Nodes carrying a collapsed tail.
    pub num_tails: usize,
    /// Distinct strings in the tail table.
    pub distinct_tails: usize,
    /// Tail storage strategy.
    pub tail_mode: TailMode,
    /// Total bytes of the raw key set the report was computed against.
    pub raw_key_bytes: usize,
    /// Bits in the topology vector.
    pub louds_bits: usize,
    /// Bytes in the edge label array.
    pub edge_bytes: usize,
    /// Bits spent on packed tail references.
    pub tail_id_bits: usize,
    /// Total in-memory size in bytes.
    pub heap_bytes: usize,
}

impl core::fmt::Display for TrieStat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "keys:          {}", self.num_keys)?;
        writeln!(f, "nodes:         {}", self.num_nodes)?;
        writeln!(
            f,
            "tails:         {} ({} distinct, {:?})",
            self.num_tails, self.distinct_tails, self.tail_mode
        )?;
        writeln!(f, "louds bits:    {}", self.louds_bits)?;
        writeln!(f, "edge bytes:    {}", self.edge_bytes)?;
        writeln!(f, "tail id bits:  {}", self.tail_id_bits)?;
        writeln!(f, "raw key bytes: {}", self.raw_key_bytes)?;
        writeln!(f, "heap bytes:    {}", self.heap_bytes)?;
        if self.num_keys > 0 {
            writeln!(
                f,
                "bits per key:  {:.1}",
                (self.heap_bytes * 8) as f64 / self.num_keys as f64
            )?;
        }
        Ok(())
    }
}
