//! LOUDS trie dictionary.
//!
//! A static ordered-string dictionary over opaque byte keys. Built once from
//! a key set, immutable thereafter; queries are pure reads and safe to share
//! across threads.
//!
//! # Operations
//!
//! - [`Trie::prefix_search`] - longest key that is a prefix of the query
//! - [`Trie::common_prefix_search`] - every key that is a prefix of the query
//! - [`Trie::predictive_search`] - every key the query is a prefix of
//! - [`Trie::decode`] - recover a key from its ID
//!
//! # Example
//!
//! ```
//! use loudly::{TailMode, Trie, TrieConfig};
//!
//! let config = TrieConfig::default().with_tail_mode(TailMode::Flat);
//! let trie = Trie::build(&["north", "northeast", "south"], &config);
//!
//! let ids = trie.predictive_search(b"north");
//! assert_eq!(ids.len(), 2);
//! assert_eq!(trie.decode(ids[0]).unwrap(), b"north");
//! ```

pub(crate) mod builder;
mod config;
mod louds;
pub(crate) mod tail;

pub use config::{TailMode, TrieConfig};
pub use louds::{KeyId, PrefixMatch, Trie, TrieStat};
