use crate::compression::offset::EncodedOffset;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::postings::PostingsId;
use crate::index::token_store::TokenId;

/// Stable handle of a record in the node table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Where a node's occurrences live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingsRef {
    None,
    Local(PostingsId),          // Slot in the in-memory postings store
    External(EncodedOffset),    // Offset into postings written by a bulk load
}

/// One trie node: edge label, ordered children and postings descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub label: Option<TokenId>,   // None only for the root
    pub children: Vec<NodeId>,    // Ordered by first label byte
    pub postings_size: u32,
    pub postings: PostingsRef,
}

impl NodeRecord {
    pub fn root() -> Self {
        NodeRecord {
            label: None,
            children: Vec::new(),
            postings_size: 0,
            postings: PostingsRef::None,
        }
    }

    pub fn leaf(label: TokenId) -> Self {
        NodeRecord {
            label: Some(label),
            children: Vec::new(),
            postings_size: 0,
            postings: PostingsRef::None,
        }
    }

    pub fn has_postings(&self) -> bool {
        !matches!(self.postings, PostingsRef::None)
    }

    /// Render as `[label, child_count, children..., size, p0(, p1)]`
    ///
    /// The root label is -1. Local postings are written as their slot index,
    /// external ones through the offset encoding; a node without postings
    /// writes size 0 and pointer 0.
    pub fn write_compact(&self, out: &mut Vec<i32>) -> Result<()> {
        let int = |value: u32| {
            i32::try_from(value).map_err(|_| {
                Error::new(
                    ErrorKind::Internal,
                    format!("Value {} does not fit a compact record", value),
                )
            })
        };

        out.push(match self.label {
            Some(token) => int(token.0)?,
            None => -1,
        });
        out.push(int(self.children.len() as u32)?);
        for child in &self.children {
            out.push(int(child.0)?);
        }
        out.push(int(self.postings_size)?);
        match self.postings {
            PostingsRef::None => out.push(0),
            PostingsRef::Local(slot) => out.push(int(slot.0)?),
            PostingsRef::External(offset) => offset.write_to(out),
        }
        Ok(())
    }

    /// Parse a record written by [`write_compact`](Self::write_compact)
    ///
    /// `external` tells whether the pointer is an encoded offset, which is a
    /// property of how the index was built, not of the record itself.
    pub fn read_compact(ints: &[i32], external: bool) -> Result<Self> {
        let malformed = || {
            Error::new(
                ErrorKind::Internal,
                format!("Malformed node record {:?}", ints),
            )
        };

        let (&label, rest) = ints.split_first().ok_or_else(malformed)?;
        let (&count, rest) = rest.split_first().ok_or_else(malformed)?;
        let count = usize::try_from(count).map_err(|_| malformed())?;
        if rest.len() < count + 2 {
            return Err(malformed());
        }
        let (children, rest) = rest.split_at(count);
        let (&size, pointer) = rest.split_first().ok_or_else(malformed)?;
        if size < 0 || pointer.is_empty() || pointer.len() > 2 {
            return Err(malformed());
        }

        let label = match label {
            -1 => None,
            l if l >= 0 => Some(TokenId(l as u32)),
            _ => return Err(malformed()),
        };
        let children = children
            .iter()
            .map(|&c| u32::try_from(c).map(NodeId).map_err(|_| malformed()))
            .collect::<Result<Vec<_>>>()?;

        let postings = if size == 0 && pointer == [0] {
            PostingsRef::None
        } else if external {
            PostingsRef::External(EncodedOffset::read_from(pointer)?)
        } else {
            match *pointer {
                [slot] if slot >= 0 => PostingsRef::Local(PostingsId(slot as u32)),
                _ => return Err(malformed()),
            }
        };

        Ok(NodeRecord {
            label,
            children,
            postings_size: size as u32,
            postings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_record_layout() {
        let mut out = Vec::new();
        NodeRecord::root().write_compact(&mut out).unwrap();
        assert_eq!(out, vec![-1, 0, 0, 0]);
        assert_eq!(NodeRecord::read_compact(&out, false).unwrap(), NodeRecord::root());
    }

    #[test]
    fn external_split_offset_layout() {
        let record = NodeRecord {
            label: Some(TokenId(3)),
            children: vec![NodeId(4), NodeId(9)],
            postings_size: 12,
            postings: PostingsRef::External(EncodedOffset::encode(1 << 33).unwrap()),
        };
        let mut out = Vec::new();
        record.write_compact(&mut out).unwrap();
        assert_eq!(out, vec![3, 2, 4, 9, 12, 1 << 17, 0]);
        assert_eq!(NodeRecord::read_compact(&out, true).unwrap(), record);
    }

    #[test]
    fn oversized_postings_size_is_rejected() {
        let record = NodeRecord {
            label: Some(TokenId(0)),
            children: Vec::new(),
            postings_size: u32::MAX,
            postings: PostingsRef::External(EncodedOffset::Single(7)),
        };
        let mut out = Vec::new();
        assert_eq!(record.write_compact(&mut out).unwrap_err().kind(), ErrorKind::Internal);
    }

    #[test]
    fn truncated_record_is_rejected() {
        assert!(NodeRecord::read_compact(&[3, 2, 4], false).is_err());
    }
}
