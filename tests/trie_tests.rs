use std::sync::Arc;
use std::thread;
use ftrie::core::config::Config;
use ftrie::core::error::ErrorKind;
use ftrie::core::types::{Document, Occurrence};
use ftrie::index::builder::{IndexBuilder, SortedEntry, SortedLoader};
use ftrie::index::node::{NodeId, NodeRecord, PostingsRef};
use ftrie::index::trie::{PostingsView, TrieIndex};

fn tokens(trie: &TrieIndex) -> Vec<String> {
    trie.tokens()
        .unwrap()
        .into_iter()
        .map(|t| String::from_utf8(t.token).unwrap())
        .collect()
}

#[test]
fn diverging_tokens_fork_shared_prefix() {
    let mut trie = TrieIndex::new(Config::default());
    let cat = trie.index(b"cat", 1u32, 0).unwrap();
    let car = trie.index(b"car", 1u32, 4).unwrap();

    let root_children = trie.children(NodeId::ROOT).unwrap();
    assert_eq!(root_children.len(), 1);
    let ca = root_children[0];
    assert_eq!(ca, cat);
    assert_eq!(trie.label(ca).unwrap(), b"ca");
    assert!(!trie.node(ca).unwrap().has_postings());

    let children = trie.children(ca).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(trie.label(children[0]).unwrap(), b"r");
    assert_eq!(trie.label(children[1]).unwrap(), b"t");
    assert_eq!(children[0], car);

    assert_eq!(trie.lookup(b"ca").unwrap(), None);
    assert_eq!(trie.lookup(b"cat").unwrap(), Some(children[1]));
    assert_eq!(tokens(&trie), vec!["car", "cat"]);
    assert_eq!(trie.node_count(), 4);
    trie.verify().unwrap();
}

#[test]
fn token_ending_inside_label_splits_above() {
    let mut trie = TrieIndex::new(Config::default());
    trie.index(b"cart", 1u32, 0).unwrap();
    let car = trie.index(b"car", 2u32, 0).unwrap();

    assert_eq!(trie.label(car).unwrap(), b"car");
    assert_eq!(trie.node(car).unwrap().postings_size, 1);
    let children = trie.children(car).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(trie.label(children[0]).unwrap(), b"t");

    assert_eq!(trie.occurrences(b"car").unwrap(), vec![Occurrence::new(2u32, 0)]);
    assert_eq!(trie.occurrences(b"cart").unwrap(), vec![Occurrence::new(1u32, 0)]);
    trie.verify().unwrap();
}

#[test]
fn repeated_token_merges_postings_in_order() {
    let mut trie = TrieIndex::new(Config::default());
    let first = trie.index(b"dog", 1u32, 0).unwrap();
    let second = trie.index(b"dog", 2u32, 5).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        trie.occurrences(b"dog").unwrap(),
        vec![Occurrence::new(1u32, 0), Occurrence::new(2u32, 5)]
    );
    assert_eq!(trie.estimate(b"dog").unwrap(), 2);
    assert_eq!(trie.estimate(b"cat").unwrap(), 0);

    match trie.postings(first).unwrap() {
        PostingsView::Local { locations, offsets } => {
            assert_eq!(locations, &[1, 2]);
            assert_eq!(offsets, &[0, 5]);
        }
        other => panic!("unexpected postings {:?}", other),
    }
}

#[test]
fn case_insensitive_matches_folded_and_keeps_case() {
    let mut trie = TrieIndex::new(Config::default());
    trie.index(b"Cat", 1u32, 0).unwrap();
    trie.index(b"cAT", 2u32, 3).unwrap();

    assert!(trie.lookup(b"cat").unwrap().is_some());
    assert!(trie.lookup(b"CAT").unwrap().is_some());
    assert_eq!(trie.estimate(b"cat").unwrap(), 2);
    assert_eq!(tokens(&trie), vec!["Cat"]);
}

#[test]
fn case_sensitive_keeps_variants_apart() {
    let mut trie = TrieIndex::new(Config::default().with_case_sensitive(true).with_bulk_load(false));
    trie.index(b"Cat", 1u32, 0).unwrap();
    trie.index(b"cat", 2u32, 0).unwrap();
    trie.index(b"bat", 3u32, 0).unwrap();

    assert_eq!(trie.estimate(b"Cat").unwrap(), 1);
    assert_eq!(trie.estimate(b"cat").unwrap(), 1);
    assert_eq!(trie.lookup(b"CAT").unwrap(), None);
    // Lowercase sorts right before its uppercase form
    assert_eq!(tokens(&trie), vec!["bat", "cat", "Cat"]);
    trie.verify().unwrap();
}

#[test]
fn node_limit_rejects_without_mutation() {
    let mut trie = TrieIndex::new(Config::default().with_limits(3, 100));
    trie.index(b"a", 1u32, 0).unwrap();
    trie.index(b"b", 1u32, 1).unwrap();

    let err = trie.index(b"c", 2u32, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert_eq!(trie.node_count(), 3);
    assert_eq!(trie.lookup(b"c").unwrap(), None);
    assert!(!trie.universe().contains(2));

    // Merging into an existing node needs no room
    trie.index(b"a", 3u32, 0).unwrap();
    assert_eq!(trie.estimate(b"a").unwrap(), 2);
}

#[test]
fn token_limit_rejects_fork() {
    let mut trie = TrieIndex::new(Config::default().with_limits(100, 2));
    trie.index(b"cat", 1u32, 0).unwrap();

    // A fork needs two more labels
    let err = trie.index(b"car", 1u32, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert_eq!(tokens(&trie), vec!["cat"]);
    trie.verify().unwrap();
}

#[test]
fn empty_token_is_invalid_input() {
    let mut trie = TrieIndex::new(Config::default());
    assert_eq!(trie.index(b"", 1u32, 0).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(trie.insert_sorted(b"", 1, 0).unwrap_err().kind(), ErrorKind::InvalidInput);
}

#[test]
fn prefix_lists_tokens_below_partial_label() {
    let mut trie = TrieIndex::new(Config::default());
    for (i, token) in ["card", "care", "cart", "dog", "ca"].iter().enumerate() {
        trie.index(token.as_bytes(), i as u32, 0).unwrap();
    }

    let found: Vec<String> = trie
        .prefix(b"car")
        .unwrap()
        .into_iter()
        .map(|t| String::from_utf8(t.token).unwrap())
        .collect();
    assert_eq!(found, vec!["card", "care", "cart"]);

    let all_ca = trie.prefix(b"c").unwrap();
    assert_eq!(all_ca.len(), 4);
    assert!(trie.prefix(b"cx").unwrap().is_empty());
    assert!(trie.prefix(b"z").unwrap().is_empty());
}

#[test]
fn sorted_load_attaches_external_postings() {
    let entries = vec![
        SortedEntry::new("apple", 3, 0),
        SortedEntry::new("apply", 1, 3),
        SortedEntry::new("banana", 2, (1u64 << 33) + 7),
    ];
    let trie = SortedLoader::new(Config::default()).load(&entries).unwrap();

    let apple = trie.lookup(b"apple").unwrap().unwrap();
    assert_eq!(trie.postings(apple).unwrap(), PostingsView::External { size: 3, offset: 0 });
    let banana = trie.lookup(b"banana").unwrap().unwrap();
    assert_eq!(
        trie.postings(banana).unwrap(),
        PostingsView::External { size: 2, offset: (1u64 << 33) + 7 }
    );
    assert!(matches!(trie.node(banana).unwrap().postings, PostingsRef::External(_)));

    assert_eq!(trie.estimate(b"apply").unwrap(), 1);
    assert_eq!(trie.occurrences(b"apple").unwrap_err().kind(), ErrorKind::UnsupportedQuery);
    trie.verify().unwrap();
}

#[test]
fn sorted_load_rejects_duplicates_and_empty_postings() {
    let mut trie = TrieIndex::new(Config::default());
    trie.insert_sorted(b"alpha", 2, 10).unwrap();
    assert_eq!(trie.insert_sorted(b"alpha", 2, 12).unwrap_err().kind(), ErrorKind::InvalidState);
    assert_eq!(trie.insert_sorted(b"beta", 0, 12).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(trie.index(b"alpha", 1u32, 0).unwrap_err().kind(), ErrorKind::InvalidState);
}

#[test]
fn compact_records_follow_node_layout() {
    let mut trie = TrieIndex::new(Config::default());
    trie.index(b"cat", 1u32, 0).unwrap();
    let records = trie.compact_records().unwrap();

    assert_eq!(records.len(), 2);
    // Root: no label, one child, no postings
    assert_eq!(records[0][0], -1);
    assert_eq!(records[0][1], 1);
    assert_eq!(records[0][2], 1);
    // Leaf: label slot, no children, one posting
    assert_eq!(records[1][1], 0);
    assert_eq!(records[1][2], 1);
}

#[test]
fn large_sorted_sizes_survive_compact_records() {
    let mut trie = TrieIndex::new(Config::default());
    let largest = i32::MAX as u32;
    let node = trie.insert_sorted(b"x", largest, (1u64 << 35) + 3).unwrap();

    let records = trie.compact_records().unwrap();
    let record = NodeRecord::read_compact(&records[node.index()], true).unwrap();
    assert_eq!(&record, trie.node(node).unwrap());
    assert_eq!(record.postings_size, largest);

    let err = trie.insert_sorted(b"y", largest + 1, 7).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(trie.lookup(b"y").unwrap(), None);
    assert_eq!(trie.compact_records().unwrap().len(), 2);
}

#[test]
fn builder_indexes_documents() {
    let docs = vec![
        Document::new(1u32, "the quick brown fox"),
        Document::new(2u32, "the lazy dog"),
        Document::new(3u32, ""),
    ];
    let mut builder = IndexBuilder::new(Config::default());
    builder.add_documents(&docs).unwrap();
    let trie = builder.finish();

    assert_eq!(trie.occurrences(b"the").unwrap(), vec![Occurrence::new(1u32, 0), Occurrence::new(2u32, 0)]);
    assert_eq!(trie.occurrences(b"fox").unwrap(), vec![Occurrence::new(1u32, 3)]);
    assert_eq!(trie.universe().len(), 3);

    let stats = trie.stats().unwrap();
    assert_eq!(stats.indexed_tokens, 6);
    assert_eq!(stats.occurrences, 7);
    assert!(stats.to_json().unwrap().contains("\"indexed_tokens\":6"));
}

#[test]
fn built_trie_is_shared_across_readers() {
    let mut trie = TrieIndex::new(Config::default());
    let words = ["alpha", "beta", "gamma", "delta", "alphabet", "be"];
    for (i, w) in words.iter().enumerate() {
        trie.index(w.as_bytes(), i as u32, 0).unwrap();
    }
    let trie = Arc::new(trie);

    thread::scope(|scope| {
        for _ in 0..4 {
            let trie = Arc::clone(&trie);
            scope.spawn(move || {
                for w in words {
                    assert_eq!(trie.estimate(w.as_bytes()).unwrap(), 1);
                }
                assert_eq!(trie.lookup(b"alph").unwrap(), None);
            });
        }
    });
}
