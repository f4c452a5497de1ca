use crate::core::error::{Error, ErrorKind, Result};

/// Handle of a label slot in the token store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u32);

/// Append-only store of trie edge labels
///
/// Slots are never freed or reused. A slot's bytes may only be replaced by
/// one of their own prefixes, which is how a prefix split shortens a label
/// without changing the handle the node refers to.
#[derive(Debug, Default)]
pub struct TokenStore {
    labels: Vec<Vec<u8>>,
    limit: usize,
}

impl TokenStore {
    pub fn with_capacity(capacity: usize, limit: usize) -> Self {
        TokenStore {
            labels: Vec::with_capacity(capacity.min(limit)),
            limit,
        }
    }

    pub fn push(&mut self, label: &[u8]) -> Result<TokenId> {
        if label.is_empty() {
            return Err(Error::invalid_input("Edge labels must not be empty"));
        }
        if self.labels.len() >= self.limit {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                format!("Token store is full ({} labels)", self.limit),
            ));
        }
        let id = TokenId(self.labels.len() as u32);
        self.labels.push(label.to_vec());
        Ok(id)
    }

    pub fn get(&self, id: TokenId) -> Result<&[u8]> {
        self.labels
            .get(id.0 as usize)
            .map(|label| label.as_slice())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidNode,
                    format!("Token {} out of range ({} stored)", id.0, self.labels.len()),
                )
            })
    }

    /// Shorten a label in place to its first `len` bytes
    pub fn shrink(&mut self, id: TokenId, len: usize) -> Result<()> {
        let stored = self.labels.len();
        let label = self.labels.get_mut(id.0 as usize).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidNode,
                format!("Token {} out of range ({} stored)", id.0, stored),
            )
        })?;
        if len == 0 || len >= label.len() {
            return Err(Error::new(
                ErrorKind::Internal,
                format!("Cannot shrink label of length {} to {}", label.len(), len),
            ));
        }
        label.truncate(len);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
