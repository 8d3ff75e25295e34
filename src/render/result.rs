//! Rendering result with diagnostics and statistics.

use crate::model::MarkerKind;
use serde::{Deserialize, Serialize};

/// Result of rendering a document to USX.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered USX markup
    pub content: String,

    /// Identifiers of markers that had no emission rule, in first-seen order
    pub unrenderable_tags: Vec<String>,

    /// Rendering statistics, when collected
    pub stats: Option<RenderStats>,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, unrenderable_tags: Vec<String>) -> Self {
        Self {
            content,
            unrenderable_tags,
            stats: None,
        }
    }

    /// Attach statistics.
    pub fn with_stats(mut self, stats: RenderStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Whether every marker in the document was rendered.
    pub fn is_complete(&self) -> bool {
        self.unrenderable_tags.is_empty()
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts collected while walking the marker tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Book (`\id`) markers rendered
    pub book_count: u32,

    /// Chapters rendered
    pub chapter_count: u32,

    /// Verses rendered
    pub verse_count: u32,

    /// Paragraph-level elements rendered
    pub paragraph_count: u32,

    /// Footnotes and cross references rendered
    pub note_count: u32,

    /// Tables rendered
    pub table_count: u32,

    /// Markers skipped for lack of an emission rule, counting repeats
    pub unrenderable_count: u32,

    /// Whitespace-separated words of prose
    pub word_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one visited marker.
    pub fn record(&mut self, kind: &MarkerKind) {
        use MarkerKind::*;
        match kind {
            Id { .. } => self.book_count += 1,
            C { .. } => self.chapter_count += 1,
            V { .. } => self.verse_count += 1,
            F { .. } | X { .. } => self.note_count += 1,
            TableBlock => self.table_count += 1,
            Text { text } => self.word_count += text.split_whitespace().count() as u32,
            Ide { .. } | Usfm { .. } | H { .. } | Toc1 { .. } | Toc2 { .. } | Toc3 { .. }
            | Mt { .. } | Imt { .. } | Ms { .. } | S { .. } | D { .. } | Sp { .. } | R | P
            | Pi { .. } | Q { .. } | Qm { .. } | Qc | Qr | Li { .. } | B => {
                self.paragraph_count += 1
            }
            _ => {}
        }
    }

    /// Count one marker skipped for lack of an emission rule.
    pub fn record_unrenderable(&mut self) {
        self.unrenderable_count += 1;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.book_count += other.book_count;
        self.chapter_count += other.chapter_count;
        self.verse_count += other.verse_count;
        self.paragraph_count += other.paragraph_count;
        self.note_count += other.note_count;
        self.table_count += other.table_count;
        self.unrenderable_count += other.unrenderable_count;
        self.word_count += other.word_count;
    }
}
