//! # usx
//!
//! Renders parsed USFM marker trees to USX, the XML interchange format for
//! scripture text.
//!
//! The crate is the last stage of a USFM pipeline: an upstream parser turns
//! USFM source into a [`Document`] of typed [`Marker`]s, and this crate
//! serializes that tree to USX 2.5 or USX 3.0.
//!
//! ## Quick Start
//!
//! ```no_run
//! use usx::{render_file, UsxConfig};
//!
//! fn main() -> usx::Result<()> {
//!     // Marker tree exported by the parser as JSON
//!     let result = render_file("genesis.json", &UsxConfig::default())?;
//!     println!("{}", result.content);
//!
//!     for tag in &result.unrenderable_tags {
//!         eprintln!("not rendered: \\{}", tag);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two dialects**: USX 3.0 sid/eid milestones, or USX 2.5 plain tags
//! - **Fragments**: partial output without the XML declaration and root
//! - **Diagnostics**: markers without a USX rendering are reported, not fatal
//! - **Batch rendering**: many documents in parallel with Rayon

pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{Document, Marker, MarkerKind};
pub use render::{to_usx, RenderResult, RenderStats, SchemaVersion, UsxConfig, UsxRenderer};

use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Render an in-memory document.
///
/// # Example
///
/// ```
/// use usx::{render, Document, Marker, MarkerKind, UsxConfig};
///
/// let doc = Document::with_contents(vec![Marker::new(MarkerKind::Id {
///     text_identifier: "GEN 66".to_string(),
/// })]);
/// let result = render(&doc, &UsxConfig::new().with_partial_output(true)).unwrap();
/// assert_eq!(result.content, "<book style=\"id\" code=\"GEN\">66</book>\n");
/// ```
pub fn render(doc: &Document, config: &UsxConfig) -> Result<RenderResult> {
    to_usx(doc, config)
}

/// Load a marker tree from a JSON file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    log::debug!("loading marker tree from {}", path.display());
    let file = File::open(path)?;
    Document::from_reader(BufReader::new(file))
}

/// Render a marker tree stored as JSON in a file.
///
/// # Arguments
///
/// * `path` - Path to the JSON marker tree
/// * `config` - Rendering options
///
/// # Example
///
/// ```no_run
/// use usx::{render_file, SchemaVersion, UsxConfig};
///
/// let config = UsxConfig::new().with_schema_version(SchemaVersion::V2_5);
/// let result = render_file("exodus.json", &config).unwrap();
/// std::fs::write("exodus.usx", result.content).unwrap();
/// ```
pub fn render_file<P: AsRef<Path>>(path: P, config: &UsxConfig) -> Result<RenderResult> {
    let doc = load_file(path)?;
    to_usx(&doc, config)
}

/// Render a marker tree given as a JSON string.
pub fn render_json(json: &str, config: &UsxConfig) -> Result<RenderResult> {
    let doc = Document::from_json(json)?;
    to_usx(&doc, config)
}

/// Render a marker tree read as JSON from a reader.
pub fn render_reader<R: Read>(reader: R, config: &UsxConfig) -> Result<RenderResult> {
    let doc = Document::from_reader(reader)?;
    to_usx(&doc, config)
}

/// Render many documents in parallel.
///
/// Each document gets its own renderer, so diagnostics and chapter/verse
/// state never leak between documents. Results are returned in input
/// order.
pub fn render_batch(docs: &[Document], config: &UsxConfig) -> Vec<Result<RenderResult>> {
    log::debug!("rendering batch of {} documents", docs.len());
    docs.par_iter().map(|doc| to_usx(doc, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json() {
        let json = r#"{"contents":[
            {"marker":"id","text_identifier":"MRK Mark"},
            {"marker":"c","number":1,"contents":[
                {"marker":"p","contents":[
                    {"marker":"v","verse_number":"1","contents":[
                        {"marker":"text","text":"The beginning of the gospel"}
                    ]}
                ]}
            ]}
        ]}"#;

        let result = render_json(json, &UsxConfig::new().with_partial_output(true)).unwrap();
        assert!(result.content.contains("<book style=\"id\" code=\"MRK\">Mark</book>"));
        assert!(result
            .content
            .contains("<para style=\"p\"><verse style=\"v\" number=\"1\" sid=\"MRK 1:1\" />"));
        assert!(result.is_complete());
    }

    #[test]
    fn test_render_json_reports_unmodeled_tags() {
        let json = r#"{"contents":[
            {"marker":"id","text_identifier":"GEN 66"},
            {"marker":"k","contents":[{"marker":"text","text":"keyword"}]},
            {"marker":"p","contents":[{"marker":"text","text":"kept"}]},
            {"marker":"qt"},
            {"marker":"k"}
        ]}"#;

        let result = render_json(json, &UsxConfig::new().with_partial_output(true)).unwrap();
        assert_eq!(result.unrenderable_tags, vec!["k", "qt"]);
        assert!(!result.content.contains("keyword"));
        assert!(result.content.contains("<para style=\"p\">kept</para>"));
    }

    #[test]
    fn test_render_json_invalid() {
        let result = render_json("not json", &UsxConfig::default());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_render_reader() {
        let json = br#"{"contents":[{"marker":"h","header_text":"Genesis"}]}"#;
        let result = render_reader(&json[..], &UsxConfig::new().with_partial_output(true)).unwrap();
        assert_eq!(result.content, "<para style=\"h\">Genesis</para>\n");
    }

    #[test]
    fn test_load_file_missing() {
        let result = load_file("/nonexistent/marker-tree.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_render_batch_keeps_order_and_errors() {
        let good = Document::with_contents(vec![Marker::new(MarkerKind::Id {
            text_identifier: "RUT Ruth".into(),
        })]);
        let bad = Document::with_contents(vec![Marker::new(MarkerKind::Id {
            text_identifier: "RU".into(),
        })]);

        let results = render_batch(&[good.clone(), bad, good], &UsxConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::MalformedBookIdentifier(_))));
        assert_eq!(
            results[0].as_ref().unwrap().content,
            results[2].as_ref().unwrap().content
        );
    }
}
