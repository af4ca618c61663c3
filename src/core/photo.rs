//! Photo records and the catalog document they are shipped in.

use serde::{Deserialize, Serialize};

/// A single historical photograph.
///
/// Photos are created by a [`PhotoSource`](crate::source::PhotoSource) and
/// are read-only to the game engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub filename: String,
    /// The year the photo was taken
    pub year: i32,
    pub description: String,
}

impl Photo {
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        year: i32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            year,
            description: description.into(),
        }
    }
}

/// The catalog document: `{ "photos": [ ... ] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSet {
    pub photos: Vec<Photo>,
}

impl PhotoSet {
    /// Parse a catalog document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}
