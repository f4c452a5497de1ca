use serde::{Serialize, Deserialize};

/// Document location (node pre value) an occurrence belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u32);

impl LocationId {
    pub fn new(id: u32) -> Self {
        LocationId(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for LocationId {
    fn from(id: u32) -> Self {
        LocationId(id)
    }
}

/// Single token occurrence: where it was found and at which token position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub location: LocationId,
    pub offset: u32,
}

impl Occurrence {
    pub fn new(location: impl Into<LocationId>, offset: u32) -> Self {
        Occurrence {
            location: location.into(),
            offset,
        }
    }
}

/// Text attached to one document location, fed to the index builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub location: LocationId,
    pub text: String,
}

impl Document {
    pub fn new(location: impl Into<LocationId>, text: impl Into<String>) -> Self {
        Document {
            location: location.into(),
            text: text.into(),
        }
    }
}
