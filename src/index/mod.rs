pub mod token_store;
pub mod node;
pub mod node_table;
pub mod postings;
pub mod child_search;
pub mod trie;
pub mod builder;
