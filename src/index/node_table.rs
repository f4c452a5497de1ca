use crate::core::error::{Error, ErrorKind, Result};
use crate::index::node::{NodeId, NodeRecord};

/// Arena of trie node records addressed by stable handles
///
/// Records are appended and updated in place, never moved or removed, so a
/// `NodeId` stays valid for the lifetime of the table. Every child handle
/// stored in a record is checked against the arena when it is written.
#[derive(Debug)]
pub struct NodeTable {
    records: Vec<NodeRecord>,
    first_bytes: Vec<u8>,  // First label byte per node; labels only ever lose their tail
    limit: usize,
}

impl NodeTable {
    /// Create a table holding only the root record
    pub fn new(capacity: usize, limit: usize) -> Self {
        let capacity = capacity.clamp(1, limit.max(1));
        let mut records = Vec::with_capacity(capacity);
        let mut first_bytes = Vec::with_capacity(capacity);
        records.push(NodeRecord::root());
        first_bytes.push(0);
        NodeTable {
            records,
            first_bytes,
            limit: limit.max(1),
        }
    }

    /// Fail unless `additional` more records fit
    pub fn ensure_room(&self, additional: usize) -> Result<()> {
        if self.records.len() + additional > self.limit {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                format!(
                    "Node table is full ({} of {} records, {} more requested)",
                    self.records.len(), self.limit, additional
                ),
            ));
        }
        Ok(())
    }

    pub fn push(&mut self, record: NodeRecord, first_byte: u8) -> Result<NodeId> {
        self.ensure_room(1)?;
        self.check_children(&record.children)?;
        let id = NodeId(self.records.len() as u32);
        self.records.push(record);
        self.first_bytes.push(first_byte);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Result<&NodeRecord> {
        self.records
            .get(id.index())
            .ok_or_else(|| Self::out_of_range(id, self.records.len()))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord> {
        let len = self.records.len();
        self.records
            .get_mut(id.index())
            .ok_or_else(|| Self::out_of_range(id, len))
    }

    /// Overwrite a record in place; the handle keeps pointing at it
    pub fn replace(&mut self, id: NodeId, record: NodeRecord) -> Result<()> {
        self.check_children(&record.children)?;
        *self.get_mut(id)? = record;
        Ok(())
    }

    pub fn insert_child(&mut self, parent: NodeId, position: usize, child: NodeId) -> Result<()> {
        self.check_children(&[child])?;
        let record = self.get_mut(parent)?;
        if position > record.children.len() {
            return Err(Error::new(
                ErrorKind::Internal,
                format!(
                    "Child position {} past the end of node {} ({} children)",
                    position, parent.0, record.children.len()
                ),
            ));
        }
        record.children.insert(position, child);
        Ok(())
    }

    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) -> Result<()> {
        self.check_children(&children)?;
        self.get_mut(id)?.children = children;
        Ok(())
    }

    /// First label byte of a node handed out by this table
    #[inline]
    pub fn first_byte(&self, id: NodeId) -> u8 {
        self.first_bytes[id.index()]
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present
        false
    }

    fn check_children(&self, children: &[NodeId]) -> Result<()> {
        match children.iter().find(|c| c.index() >= self.records.len()) {
            Some(&bad) => Err(Self::out_of_range(bad, self.records.len())),
            None => Ok(()),
        }
    }

    fn out_of_range(id: NodeId, len: usize) -> Error {
        Error::new(
            ErrorKind::InvalidNode,
            format!("Node {} out of range ({} nodes)", id.0, len),
        )
    }
}
