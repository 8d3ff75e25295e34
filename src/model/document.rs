//! Document-level types.

use super::marker::{Descendants, Marker, MarkerKind};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A parsed USFM document, handed over by the upstream parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level markers in document order
    #[serde(default)]
    pub contents: Vec<Marker>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from top-level markers.
    pub fn with_contents(contents: Vec<Marker>) -> Self {
        Self { contents }
    }

    /// Append a top-level marker.
    pub fn push(&mut self, marker: Marker) {
        self.contents.push(marker);
    }

    /// Check if the document has no markers.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Iterate over every marker in the document, depth-first in document
    /// order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::from_roots(&self.contents)
    }

    /// The encoding declared by the first `\ide` marker, if any.
    pub fn encoding(&self) -> Option<&str> {
        self.descendants().find_map(|m| match &m.kind {
            MarkerKind::Ide { encoding } => Some(encoding.as_str()),
            _ => None,
        })
    }

    /// The raw `\id` text of the first book marker, if any.
    pub fn book_identifier(&self) -> Option<&str> {
        self.descendants().find_map(|m| match &m.kind {
            MarkerKind::Id { text_identifier } => Some(text_identifier.as_str()),
            _ => None,
        })
    }

    /// Count markers matching a predicate.
    pub fn count_markers<F>(&self, predicate: F) -> usize
    where
        F: Fn(&MarkerKind) -> bool,
    {
        self.descendants().filter(|m| predicate(&m.kind)).count()
    }

    /// Read a marker tree from its JSON interchange form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a marker tree from a reader holding JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize the marker tree to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl FromIterator<Marker> for Document {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self {
            contents: iter.into_iter().collect(),
        }
    }
}
