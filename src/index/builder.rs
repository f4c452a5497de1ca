use std::time::Instant;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::Document;
use crate::index::trie::TrieIndex;

/// Feeds tokenized documents into a trie, one `index` call per occurrence
pub struct IndexBuilder {
    pub trie: TrieIndex,
    pub tokenizer: Box<dyn Tokenizer>,
    pub documents: usize,
    pub occurrences: usize,
}

impl IndexBuilder {
    pub fn new(config: Config) -> Self {
        let tokenizer = Box::new(StandardTokenizer::new(config.max_token_length));
        IndexBuilder {
            trie: TrieIndex::new(config),
            tokenizer,
            documents: 0,
            occurrences: 0,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn add_document(&mut self, doc: &Document) -> Result<()> {
        let tokens = self.tokenizer.tokenize(&doc.text);
        // Locations without tokens still belong to the universe
        self.trie.add_locations([doc.location]);

        for token in &tokens {
            self.trie.index(token.as_bytes(), doc.location, token.position)?;
        }

        self.documents += 1;
        self.occurrences += tokens.len();
        Ok(())
    }

    pub fn add_documents<'a, I>(&mut self, docs: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let start = Instant::now();
        let before = self.occurrences;
        for doc in docs {
            self.add_document(doc)?;
        }
        log::debug!(
            "Indexed {} occurrences in {:?} ({} nodes)",
            self.occurrences - before,
            start.elapsed(),
            self.trie.node_count()
        );
        Ok(())
    }

    /// Finish construction; the returned trie is read-only from here on
    pub fn finish(self) -> TrieIndex {
        log::info!(
            "Index built with {} tokenizer: {} documents, {} occurrences, {} nodes",
            self.tokenizer.name(),
            self.documents,
            self.occurrences,
            self.trie.node_count()
        );
        self.trie
    }
}

/// One entry of a pre-sorted bulk load stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedEntry {
    pub token: Vec<u8>,
    pub size: u32,     // Number of postings written for the token
    pub offset: u64,   // Where those postings start
}

impl SortedEntry {
    pub fn new(token: impl Into<Vec<u8>>, size: u32, offset: u64) -> Self {
        SortedEntry {
            token: token.into(),
            size,
            offset,
        }
    }
}

/// Bulk loader for tokens that arrive sorted with finalized postings metadata
pub struct SortedLoader {
    pub trie: TrieIndex,
    pub loaded: usize,
}

impl SortedLoader {
    /// Sorted loads always use backward search, so `bulk_load` is forced on
    pub fn new(config: Config) -> Self {
        SortedLoader {
            trie: TrieIndex::new(config.with_bulk_load(true)),
            loaded: 0,
        }
    }

    pub fn insert(&mut self, entry: &SortedEntry) -> Result<()> {
        self.trie.insert_sorted(&entry.token, entry.size, entry.offset)?;
        self.loaded += 1;
        Ok(())
    }

    pub fn load<'a, I>(mut self, entries: I) -> Result<TrieIndex>
    where
        I: IntoIterator<Item = &'a SortedEntry>,
    {
        let start = Instant::now();
        for entry in entries {
            self.insert(entry)?;
        }
        log::info!(
            "Bulk loaded {} tokens in {:?} ({} nodes)",
            self.loaded,
            start.elapsed(),
            self.trie.node_count()
        );
        Ok(self.trie)
    }
}
