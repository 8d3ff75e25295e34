//! Marker tree types for parsed USFM content.
//!
//! This module defines the tree the upstream USFM parser hands to the
//! renderer. The renderer only reads it; nothing here is mutated while
//! rendering.

mod document;
mod marker;

pub use document::Document;
pub use marker::{Descendants, Marker, MarkerKind};
