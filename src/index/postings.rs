use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{LocationId, Occurrence};
use crate::compression::offset::EncodedOffset;

/// Handle of a postings slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostingsId(pub u32);

/// Occurrence data carried by one insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Occurrence(Occurrence),                           // General insert, merged by appending
    Finalized { size: u32, offset: EncodedOffset },  // Sorted insert, already written elsewhere
}

/// Per-node postings accumulated during general insertion
///
/// Two parallel sequences: location ids and in-token offsets. A slot's
/// entries in both always have the same length and grow together.
#[derive(Debug, Default)]
pub struct PostingsStore {
    locations: Vec<Vec<u32>>,
    offsets: Vec<Vec<u32>>,
    occurrences: usize,
}

impl PostingsStore {
    pub fn with_capacity(capacity: usize) -> Self {
        PostingsStore {
            locations: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(capacity),
            occurrences: 0,
        }
    }

    /// Start a new slot holding one occurrence
    pub fn open(&mut self, occurrence: Occurrence) -> PostingsId {
        let id = PostingsId(self.locations.len() as u32);
        self.locations.push(vec![occurrence.location.0]);
        self.offsets.push(vec![occurrence.offset]);
        self.occurrences += 1;
        id
    }

    /// Append an occurrence to an existing slot; returns the new slot length
    pub fn append(&mut self, id: PostingsId, occurrence: Occurrence) -> Result<u32> {
        let slot = id.0 as usize;
        match (self.locations.get_mut(slot), self.offsets.get_mut(slot)) {
            (Some(locations), Some(offsets)) => {
                locations.push(occurrence.location.0);
                offsets.push(occurrence.offset);
                self.occurrences += 1;
                Ok(locations.len() as u32)
            }
            _ => Err(Self::out_of_range(id, self.locations.len())),
        }
    }

    pub fn locations(&self, id: PostingsId) -> Result<&[u32]> {
        self.locations
            .get(id.0 as usize)
            .map(|l| l.as_slice())
            .ok_or_else(|| Self::out_of_range(id, self.locations.len()))
    }

    pub fn offsets(&self, id: PostingsId) -> Result<&[u32]> {
        self.offsets
            .get(id.0 as usize)
            .map(|o| o.as_slice())
            .ok_or_else(|| Self::out_of_range(id, self.offsets.len()))
    }

    pub fn occurrences(&self, id: PostingsId) -> Result<impl Iterator<Item = Occurrence> + '_> {
        let locations = self.locations(id)?;
        let offsets = self.offsets(id)?;
        Ok(locations
            .iter()
            .zip(offsets)
            .map(|(&location, &offset)| Occurrence::new(LocationId(location), offset)))
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn total_occurrences(&self) -> usize {
        self.occurrences
    }

    fn out_of_range(id: PostingsId, len: usize) -> Error {
        Error::new(
            ErrorKind::InvalidNode,
            format!("Postings slot {} out of range ({} slots)", id.0, len),
        )
    }
}
