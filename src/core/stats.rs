use serde::{Serialize, Deserialize};
use crate::core::error::Result;

/// Structural statistics of a built trie index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub nodes: usize,           // Including the root
    pub tokens: usize,          // Token store slots
    pub indexed_tokens: usize,  // Nodes carrying postings
    pub postings_lists: usize,  // Local postings slots
    pub occurrences: usize,     // Local occurrence pairs
    pub max_depth: usize,       // Longest root-to-node edge count
    pub inserts: usize,         // index() + insert_sorted() calls accepted
}

impl IndexStats {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
