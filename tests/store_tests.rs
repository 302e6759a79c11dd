//! Persistence tests: save/load fidelity and corrupt-input rejection.

use loudly::{StoreError, TailMode, Trie, TrieConfig};

const WORDS: &[&str] = &[
    "load", "loader", "loading", "save", "saved", "saver", "stream", "streaming", "store",
    "storage",
];

fn queries() -> Vec<&'static [u8]> {
    vec![
        b"load",
        b"loaders",
        b"streaming",
        b"sto",
        b"storage unit",
        b"",
        b"zzz",
    ]
}

fn assert_same_answers(a: &Trie, b: &Trie) {
    assert_eq!(a.num_keys(), b.num_keys());
    for query in queries() {
        assert_eq!(
            a.prefix_search(query).map(|m| (a.decode(m.id).unwrap(), m.len)),
            b.prefix_search(query).map(|m| (b.decode(m.id).unwrap(), m.len)),
            "prefix_search {:?}",
            query
        );
        let ca: Vec<_> = a
            .common_prefix_search(query)
            .iter()
            .map(|&id| a.decode(id).unwrap())
            .collect();
        let cb: Vec<_> = b
            .common_prefix_search(query)
            .iter()
            .map(|&id| b.decode(id).unwrap())
            .collect();
        assert_eq!(ca, cb, "common_prefix_search {:?}", query);

        let pa: Vec<_> = a
            .predictive_search(query)
            .iter()
            .map(|&id| a.decode(id).unwrap())
            .collect();
        let pb: Vec<_> = b
            .predictive_search(query)
            .iter()
            .map(|&id| b.decode(id).unwrap())
            .collect();
        assert_eq!(pa, pb, "predictive_search {:?}", query);
    }
    for id in 0..a.num_keys() as u32 {
        assert_eq!(a.decode(id), b.decode(id), "decode {}", id);
    }
}

#[test]
fn test_stream_roundtrip_both_modes() {
    for mode in [TailMode::Flat, TailMode::Nested] {
        let trie = Trie::build(WORDS, &TrieConfig::default().with_tail_mode(mode));
        let mut blob = Vec::new();
        trie.save(&mut blob).unwrap();
        let loaded = Trie::load(&mut blob.as_slice()).unwrap();
        assert_eq!(loaded.tail_mode(), mode);
        assert_same_answers(&trie, &loaded);
    }
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.trie");

    let trie = Trie::from_keys(WORDS);
    trie.save_to_path(&path).unwrap();

    let loaded = Trie::load_from_path(&path).unwrap();
    assert_same_answers(&trie, &loaded);
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-file.trie");
    assert!(matches!(
        Trie::load_from_path(&missing),
        Err(StoreError::FileOpen(_))
    ));
}

#[test]
fn test_save_into_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("missing").join("words.trie");
    let trie = Trie::from_keys(WORDS);
    assert!(matches!(
        trie.save_to_path(&bad),
        Err(StoreError::FileOpen(_))
    ));
}

#[test]
fn test_empty_blob_is_read_failure() {
    let mut empty: &[u8] = &[];
    assert!(matches!(
        Trie::load(&mut empty),
        Err(StoreError::FileRead(_))
    ));
}

#[test]
fn test_truncations_never_panic() {
    let trie = Trie::from_keys(WORDS);
    let mut blob = Vec::new();
    trie.save(&mut blob).unwrap();

    for cut in 0..blob.len() {
        let result = Trie::load(&mut &blob[..cut]);
        assert!(
            matches!(
                result,
                Err(StoreError::FileRead(_)) | Err(StoreError::Load(_))
            ),
            "truncation at {} must fail cleanly",
            cut
        );
    }
}

#[test]
fn test_tampered_key_count_rejected() {
    let trie = Trie::from_keys(WORDS);
    let mut blob = Vec::new();
    trie.save(&mut blob).unwrap();

    // The key count is the trailing u64.
    let end = blob.len();
    blob[end - 8..].copy_from_slice(&12345u64.to_le_bytes());
    assert!(matches!(
        Trie::load(&mut blob.as_slice()),
        Err(StoreError::Load("key count mismatch"))
    ));
}

#[test]
fn test_empty_trie_roundtrip() {
    let trie = Trie::from_keys::<&[u8]>(&[]);
    let mut blob = Vec::new();
    trie.save(&mut blob).unwrap();
    let loaded = Trie::load(&mut blob.as_slice()).unwrap();
    assert_eq!(loaded.num_keys(), 0);
    assert_eq!(loaded.prefix_search(b"a"), None);
}
