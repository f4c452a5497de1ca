use std::cmp::Ordering;
use roaring::RoaringBitmap;
use crate::compression::offset::EncodedOffset;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::IndexStats;
use crate::core::types::{LocationId, Occurrence};
use crate::index::child_search::{ByteOrder, SearchResult, SearchStrategy};
use crate::index::node::{NodeId, NodeRecord, PostingsRef};
use crate::index::node_table::NodeTable;
use crate::index::postings::{Payload, PostingsStore};
use crate::index::token_store::{TokenId, TokenStore};

/// Postings attached to one node, as seen by readers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingsView<'a> {
    Empty,
    Local { locations: &'a [u32], offsets: &'a [u32] },
    External { size: u32, offset: u64 },
}

impl PostingsView<'_> {
    pub fn len(&self) -> usize {
        match self {
            PostingsView::Empty => 0,
            PostingsView::Local { locations, .. } => locations.len(),
            PostingsView::External { size, .. } => *size as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Indexed token reconstructed from its root-to-node path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedToken {
    pub token: Vec<u8>,
    pub node: NodeId,
    pub postings_size: u32,
}

/// Compressed trie over token bytes mapping each token to its postings
///
/// Construction (`index`, `insert_sorted`) needs `&mut self` and is
/// single-writer. Once built, the trie is only read through `&self` and can
/// be shared across query threads behind an `Arc`.
pub struct TrieIndex {
    config: Config,
    order: ByteOrder,
    strategy: SearchStrategy,
    tokens: TokenStore,
    nodes: NodeTable,
    postings: PostingsStore,
    universe: RoaringBitmap,   // Every location passed to index()
    last_sorted: Vec<u8>,      // Previous insert_sorted token, for order checks
    inserts: usize,
}

impl TrieIndex {
    pub fn new(config: Config) -> Self {
        let capacity = config.initial_capacity;
        TrieIndex {
            order: ByteOrder::new(config.case_sensitive),
            strategy: config.search_strategy(),
            tokens: TokenStore::with_capacity(capacity, config.max_tokens),
            nodes: NodeTable::new(capacity, config.max_nodes),
            postings: PostingsStore::with_capacity(capacity),
            universe: RoaringBitmap::new(),
            last_sorted: Vec::new(),
            inserts: 0,
            config,
        }
    }

    /// Index one occurrence of `token`; tokens may arrive in any order
    ///
    /// Returns the node now holding the occurrence.
    pub fn index(&mut self, token: &[u8], location: impl Into<LocationId>, offset: u32) -> Result<NodeId> {
        self.check_token(token)?;
        let occurrence = Occurrence::new(location, offset);
        let node = self.insert(token, Payload::Occurrence(occurrence), self.strategy)?;
        self.universe.insert(occurrence.location.0);
        self.inserts += 1;
        Ok(node)
    }

    /// Add a token whose postings (`size` entries at `offset`) are already written
    ///
    /// Tokens must arrive in non-decreasing sibling order. Each token may be
    /// loaded once, with at most `i32::MAX` postings.
    pub fn insert_sorted(&mut self, token: &[u8], size: u32, offset: u64) -> Result<NodeId> {
        self.check_token(token)?;
        if size == 0 {
            return Err(Error::invalid_input(format!(
                "Sorted token {:?} has no postings",
                String::from_utf8_lossy(token)
            )));
        }
        if size > i32::MAX as u32 {
            return Err(Error::invalid_input(format!(
                "Sorted token {:?} has {} postings, more than a node record can hold",
                String::from_utf8_lossy(token),
                size
            )));
        }
        let offset = EncodedOffset::encode(offset)?;
        if !self.last_sorted.is_empty() && self.compare_tokens(&self.last_sorted, token) == Ordering::Greater {
            log::warn!(
                "Sorted insert out of order: {:?} after {:?}",
                String::from_utf8_lossy(token),
                String::from_utf8_lossy(&self.last_sorted)
            );
        }

        let node = self.insert(token, Payload::Finalized { size, offset }, SearchStrategy::LinearBackward)?;
        self.last_sorted.clear();
        self.last_sorted.extend_from_slice(token);
        self.inserts += 1;
        Ok(node)
    }

    /// Add locations to the universe without indexing tokens for them
    pub fn add_locations<I>(&mut self, locations: I)
    where
        I: IntoIterator<Item = LocationId>,
    {
        self.universe.extend(locations.into_iter().map(|l| l.0));
    }

    fn check_token(&self, token: &[u8]) -> Result<()> {
        if token.is_empty() {
            return Err(Error::invalid_input("Cannot index an empty token"));
        }
        Ok(())
    }

    fn insert(&mut self, token: &[u8], payload: Payload, strategy: SearchStrategy) -> Result<NodeId> {
        let mut parent = NodeId::ROOT;
        let mut rest = token;

        loop {
            let hit = self.search_children(parent, rest[0], strategy)?;
            if !hit.found {
                return self.attach_child(parent, hit.position, rest, payload);
            }

            let child = self.nodes.get(parent)?.children[hit.position];
            let label = self.label_of(child)?;
            let common = self.order.common_prefix(label, rest);
            let label_len = label.len();

            match (common == label_len, common == rest.len()) {
                // Same token again
                (true, true) => {
                    self.attach_payload(child, payload)?;
                    return Ok(child);
                }
                // Label consumed, continue below the child
                (true, false) => {
                    parent = child;
                    rest = &rest[common..];
                }
                // Token ends inside the label
                (false, true) => return self.split_above(child, common, payload),
                // Token and label diverge inside the label
                (false, false) => return self.split_fork(child, common, &rest[common..], payload),
            }
        }
    }

    fn search_children(&self, parent: NodeId, target: u8, strategy: SearchStrategy) -> Result<SearchResult> {
        let children = &self.nodes.get(parent)?.children;
        Ok(strategy.search(
            self.order,
            children.len(),
            |i| self.nodes.first_byte(children[i]),
            target,
        ))
    }

    /// New leaf holding all of `label` under `parent`
    fn attach_child(&mut self, parent: NodeId, position: usize, label: &[u8], payload: Payload) -> Result<NodeId> {
        self.reserve(1, 1)?;
        let token = self.tokens.push(label)?;
        let mut record = NodeRecord::leaf(token);
        self.apply_payload(&mut record, payload);
        let id = self.nodes.push(record, label[0])?;
        self.nodes.insert_child(parent, position, id)?;
        Ok(id)
    }

    /// Shorten `node`'s label to `common` bytes and push its remainder, with
    /// the node's former children and postings, one level down. The new
    /// postings land on the shortened node.
    fn split_above(&mut self, node: NodeId, common: usize, payload: Payload) -> Result<NodeId> {
        self.reserve(1, 1)?;
        let label_id = self.label_id(node)?;
        let remainder = self.tokens.get(label_id)?[common..].to_vec();
        let tail_token = self.tokens.push(&remainder)?;
        self.tokens.shrink(label_id, common)?;

        let record = self.nodes.get_mut(node)?;
        let tail = NodeRecord {
            label: Some(tail_token),
            children: std::mem::take(&mut record.children),
            postings_size: std::mem::take(&mut record.postings_size),
            postings: std::mem::replace(&mut record.postings, PostingsRef::None),
        };
        let tail_id = self.nodes.push(tail, remainder[0])?;

        let mut head = NodeRecord {
            label: Some(label_id),
            children: vec![tail_id],
            postings_size: 0,
            postings: PostingsRef::None,
        };
        self.apply_payload(&mut head, payload);
        self.nodes.replace(node, head)?;

        log::debug!("Split node {} above {} remaining label bytes", node.0, remainder.len());
        Ok(node)
    }

    /// Shorten `node`'s label to `common` bytes and give it exactly two
    /// children: its own remainder and the new token's remainder.
    fn split_fork(&mut self, node: NodeId, common: usize, branch: &[u8], payload: Payload) -> Result<NodeId> {
        self.reserve(2, 2)?;
        let label_id = self.label_id(node)?;
        let remainder = self.tokens.get(label_id)?[common..].to_vec();
        let tail_token = self.tokens.push(&remainder)?;
        let branch_token = self.tokens.push(branch)?;
        self.tokens.shrink(label_id, common)?;

        let record = self.nodes.get_mut(node)?;
        let tail = NodeRecord {
            label: Some(tail_token),
            children: std::mem::take(&mut record.children),
            postings_size: std::mem::take(&mut record.postings_size),
            postings: std::mem::replace(&mut record.postings, PostingsRef::None),
        };
        let tail_id = self.nodes.push(tail, remainder[0])?;

        let mut leaf = NodeRecord::leaf(branch_token);
        self.apply_payload(&mut leaf, payload);
        let leaf_id = self.nodes.push(leaf, branch[0])?;

        let children = match self.order.cmp(branch[0], remainder[0]) {
            Ordering::Less => vec![leaf_id, tail_id],
            _ => vec![tail_id, leaf_id],
        };
        self.nodes.set_children(node, children)?;

        log::debug!(
            "Forked node {} after {} common bytes into {} and {}",
            node.0, common, tail_id.0, leaf_id.0
        );
        Ok(leaf_id)
    }

    /// Postings for a record that has none yet
    fn apply_payload(&mut self, record: &mut NodeRecord, payload: Payload) {
        match payload {
            Payload::Occurrence(occurrence) => {
                record.postings = PostingsRef::Local(self.postings.open(occurrence));
                record.postings_size = 1;
            }
            Payload::Finalized { size, offset } => {
                record.postings = PostingsRef::External(offset);
                record.postings_size = size;
            }
        }
    }

    /// Merge postings into an existing node
    fn attach_payload(&mut self, node: NodeId, payload: Payload) -> Result<()> {
        let current = self.nodes.get(node)?.postings;
        match (current, payload) {
            (PostingsRef::None, _) => {
                let mut record = self.nodes.get(node)?.clone();
                self.apply_payload(&mut record, payload);
                self.nodes.replace(node, record)
            }
            (PostingsRef::Local(slot), Payload::Occurrence(occurrence)) => {
                let size = self.postings.append(slot, occurrence)?;
                self.nodes.get_mut(node)?.postings_size = size;
                Ok(())
            }
            (PostingsRef::External(_), Payload::Finalized { .. }) => Err(Error::invalid_state(format!(
                "Token at node {} was already loaded",
                node.0
            ))),
            _ => Err(Error::invalid_state(format!(
                "Node {} mixes sorted and general postings",
                node.0
            ))),
        }
    }

    fn reserve(&self, nodes: usize, tokens: usize) -> Result<()> {
        self.nodes.ensure_room(nodes)?;
        if self.tokens.len() + tokens > self.config.max_tokens {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                format!("Token store is full ({} labels)", self.config.max_tokens),
            ));
        }
        Ok(())
    }

    fn label_id(&self, node: NodeId) -> Result<TokenId> {
        self.nodes.get(node)?.label.ok_or_else(|| {
            Error::new(ErrorKind::Internal, format!("Node {} has no label", node.0))
        })
    }

    fn label_of(&self, node: NodeId) -> Result<&[u8]> {
        self.tokens.get(self.label_id(node)?)
    }

    /// Lexicographic comparison under the sibling order
    fn compare_tokens(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| self.order.cmp(x, y))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    }

    /// Node whose root path spells `token`, whether or not it has postings
    fn find_node(&self, token: &[u8]) -> Result<Option<NodeId>> {
        let mut node = NodeId::ROOT;
        let mut rest = token;
        while !rest.is_empty() {
            let hit = self.search_children(node, rest[0], self.strategy)?;
            if !hit.found {
                return Ok(None);
            }
            let child = self.nodes.get(node)?.children[hit.position];
            let label = self.label_of(child)?;
            if !self.order.starts_with(rest, label) {
                return Ok(None);
            }
            rest = &rest[label.len()..];
            node = child;
        }
        Ok(Some(node))
    }

    /// Node holding the postings of `token`, if it was indexed
    pub fn lookup(&self, token: &[u8]) -> Result<Option<NodeId>> {
        match self.find_node(token)? {
            Some(node) if self.nodes.get(node)?.has_postings() => Ok(Some(node)),
            _ => Ok(None),
        }
    }

    pub fn postings(&self, node: NodeId) -> Result<PostingsView<'_>> {
        let record = self.nodes.get(node)?;
        match record.postings {
            PostingsRef::None => Ok(PostingsView::Empty),
            PostingsRef::Local(slot) => Ok(PostingsView::Local {
                locations: self.postings.locations(slot)?,
                offsets: self.postings.offsets(slot)?,
            }),
            PostingsRef::External(offset) => Ok(PostingsView::External {
                size: record.postings_size,
                offset: offset.decode(),
            }),
        }
    }

    /// Occurrences of `token` in insertion order
    pub fn occurrences(&self, token: &[u8]) -> Result<Vec<Occurrence>> {
        let Some(node) = self.lookup(token)? else {
            return Ok(Vec::new());
        };
        match self.nodes.get(node)?.postings {
            PostingsRef::None => Ok(Vec::new()),
            PostingsRef::Local(slot) => Ok(self.postings.occurrences(slot)?.collect()),
            PostingsRef::External(_) => Err(Error::new(
                ErrorKind::UnsupportedQuery,
                format!(
                    "Postings of {:?} are stored externally",
                    String::from_utf8_lossy(token)
                ),
            )),
        }
    }

    /// Postings size of `token`, 0 when absent
    pub fn estimate(&self, token: &[u8]) -> Result<usize> {
        match self.lookup(token)? {
            Some(node) => Ok(self.nodes.get(node)?.postings_size as usize),
            None => Ok(0),
        }
    }

    /// Every indexed token in sibling order
    pub fn tokens(&self) -> Result<Vec<IndexedToken>> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.collect(NodeId::ROOT, &mut path, &mut out)?;
        Ok(out)
    }

    /// Indexed tokens starting with `prefix`
    pub fn prefix(&self, prefix: &[u8]) -> Result<Vec<IndexedToken>> {
        let mut node = NodeId::ROOT;
        let mut rest = prefix;
        let mut path = Vec::with_capacity(prefix.len());

        while !rest.is_empty() {
            let hit = self.search_children(node, rest[0], self.strategy)?;
            if !hit.found {
                return Ok(Vec::new());
            }
            let child = self.nodes.get(node)?.children[hit.position];
            let label = self.label_of(child)?;
            let common = self.order.common_prefix(label, rest);
            if common < rest.len() && common < label.len() {
                return Ok(Vec::new());
            }
            let consumed = common.min(rest.len());
            rest = &rest[consumed..];
            node = child;

            // Path carries the stored label; the walk below appends children
            path.extend_from_slice(label);
        }

        let mut out = Vec::new();
        let record = self.nodes.get(node)?;
        if record.has_postings() {
            out.push(IndexedToken {
                token: path.clone(),
                node,
                postings_size: record.postings_size,
            });
        }
        for &child in &record.children {
            self.collect(child, &mut path, &mut out)?;
        }
        Ok(out)
    }

    fn collect(&self, node: NodeId, path: &mut Vec<u8>, out: &mut Vec<IndexedToken>) -> Result<()> {
        let record = self.nodes.get(node)?;
        let base = path.len();
        if let Some(label) = record.label {
            path.extend_from_slice(self.tokens.get(label)?);
        }
        if record.has_postings() {
            out.push(IndexedToken {
                token: path.clone(),
                node,
                postings_size: record.postings_size,
            });
        }
        for &child in &record.children {
            self.collect(child, path, out)?;
        }
        path.truncate(base);
        Ok(())
    }

    /// Check the structural invariants: valid handles, labelled non-root
    /// nodes and strictly ordered, pairwise non-matching siblings
    pub fn verify(&self) -> Result<()> {
        for (i, record) in self.nodes.records().iter().enumerate() {
            let id = NodeId(i as u32);
            if id != NodeId::ROOT {
                let label = self.label_of(id)?;
                if label.first() != Some(&self.nodes.first_byte(id)) {
                    return Err(Error::new(
                        ErrorKind::Internal,
                        format!("Node {} first byte cache is stale", i),
                    ));
                }
            }
            for pair in record.children.windows(2) {
                let (a, b) = (self.nodes.first_byte(pair[0]), self.nodes.first_byte(pair[1]));
                if self.order.cmp(a, b) != Ordering::Less || self.order.matches(a, b) {
                    return Err(Error::new(
                        ErrorKind::Internal,
                        format!(
                            "Children {} and {} of node {} are out of order",
                            pair[0].0, pair[1].0, i
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Every node record in compact integer form, indexed by node id
    pub fn compact_records(&self) -> Result<Vec<Vec<i32>>> {
        self.nodes
            .records()
            .iter()
            .map(|record| {
                let mut ints = Vec::with_capacity(record.children.len() + 5);
                record.write_compact(&mut ints)?;
                Ok(ints)
            })
            .collect()
    }

    pub fn stats(&self) -> Result<IndexStats> {
        let mut max_depth = 0;
        let mut stack = vec![(NodeId::ROOT, 0usize)];
        let mut indexed_tokens = 0;
        while let Some((node, depth)) = stack.pop() {
            let record = self.nodes.get(node)?;
            max_depth = max_depth.max(depth);
            if record.has_postings() {
                indexed_tokens += 1;
            }
            stack.extend(record.children.iter().map(|&c| (c, depth + 1)));
        }

        Ok(IndexStats {
            nodes: self.nodes.len(),
            tokens: self.tokens.len(),
            indexed_tokens,
            postings_lists: self.postings.len(),
            occurrences: self.postings.total_occurrences(),
            max_depth,
            inserts: self.inserts,
        })
    }

    pub fn node(&self, id: NodeId) -> Result<&NodeRecord> {
        self.nodes.get(id)
    }

    /// Stored label bytes of a node; empty for the root
    pub fn label(&self, id: NodeId) -> Result<&[u8]> {
        match self.nodes.get(id)?.label {
            Some(label) => self.tokens.get(label),
            None => Ok(&[]),
        }
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.nodes.get(id)?.children)
    }

    pub fn universe(&self) -> &RoaringBitmap {
        &self.universe
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
