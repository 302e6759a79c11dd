//! Property tests: the trie must agree with a naive model on arbitrary
//! small-alphabet key sets, in both tail storage modes.

use proptest::prelude::*;

use loudly::{TailMode, Trie, TrieConfig};

/// Small alphabet forces prefix sharing; occasional empty keys exercise the
/// terminal-at-root path.
fn key_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(97u8..101, 0..10), 0..40)
}

fn model(keys: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let mut sorted = keys.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
}

fn decoded_sorted(trie: &Trie, ids: &[u32]) -> Vec<Vec<u8>> {
    let mut out: Vec<Vec<u8>> = ids.iter().map(|&id| trie.decode(id).unwrap()).collect();
    out.sort();
    out
}

proptest! {
    #[test]
    fn test_roundtrip_and_searches_match_model(
        keys in key_strategy(),
        query in prop::collection::vec(97u8..102, 0..12),
    ) {
        let expected = model(&keys);

        for mode in [TailMode::Flat, TailMode::Nested] {
            let trie = Trie::build(&keys, &TrieConfig::default().with_tail_mode(mode));
            prop_assert_eq!(trie.num_keys(), expected.len());

            // Every key decodes back through its own ID
            for key in &expected {
                let m = trie.prefix_search(key).unwrap();
                prop_assert_eq!(m.len, key.len());
                prop_assert_eq!(&trie.decode(m.id).unwrap(), key);
            }

            // prefix_search returns the longest model key prefixing the query
            let best = expected
                .iter()
                .filter(|k| query.starts_with(k))
                .max_by_key(|k| k.len());
            match (trie.prefix_search(&query), best) {
                (Some(m), Some(k)) => {
                    prop_assert_eq!(m.len, k.len());
                    prop_assert_eq!(&trie.decode(m.id).unwrap(), k);
                }
                (None, None) => {}
                (got, want) => prop_assert!(false, "got {:?}, want {:?}", got, want),
            }

            // common_prefix_search: exactly the model keys prefixing the query
            let mut want: Vec<Vec<u8>> = expected
                .iter()
                .filter(|k| query.starts_with(k))
                .cloned()
                .collect();
            want.sort();
            prop_assert_eq!(
                decoded_sorted(&trie, &trie.common_prefix_search(&query)),
                want
            );

            // predictive_search: exactly the model keys the query prefixes
            let mut want: Vec<Vec<u8>> = expected
                .iter()
                .filter(|k| k.starts_with(&query))
                .cloned()
                .collect();
            want.sort();
            prop_assert_eq!(
                decoded_sorted(&trie, &trie.predictive_search(&query)),
                want
            );
        }
    }

    #[test]
    fn test_limits_bound_results(
        keys in key_strategy(),
        query in prop::collection::vec(97u8..101, 0..6),
        limit in 0usize..8,
    ) {
        let trie = Trie::build(&keys, &TrieConfig::default());

        let all = trie.predictive_search(&query);
        let some = trie.predictive_search_with_limit(&query, limit);
        prop_assert!(some.len() <= limit);
        prop_assert_eq!(&all[..some.len()], &some[..]);

        let all = trie.common_prefix_search(&query);
        let some = trie.common_prefix_search_with_limit(&query, limit);
        prop_assert!(some.len() <= limit);
        prop_assert_eq!(&all[..some.len()], &some[..]);
    }

    #[test]
    fn test_persistence_preserves_answers(
        keys in key_strategy(),
        query in prop::collection::vec(97u8..101, 0..8),
    ) {
        let trie = Trie::build(&keys, &TrieConfig::default());
        let mut blob = Vec::new();
        trie.save(&mut blob).unwrap();
        let loaded = Trie::load(&mut blob.as_slice()).unwrap();

        prop_assert_eq!(loaded.num_keys(), trie.num_keys());
        prop_assert_eq!(
            trie.prefix_search(&query),
            loaded.prefix_search(&query)
        );
        prop_assert_eq!(
            trie.common_prefix_search(&query),
            loaded.common_prefix_search(&query)
        );
        prop_assert_eq!(
            trie.predictive_search(&query),
            loaded.predictive_search(&query)
        );
        for id in 0..trie.num_keys() as u32 {
            prop_assert_eq!(trie.decode(id), loaded.decode(id));
        }
    }
}
