//! USX rendering for parsed USFM documents.

use crate::error::Result;
use crate::model::{Document, Marker};

use super::context::RenderContext;
use super::rules::{emit, Visit};
use super::{RenderResult, RenderStats, UsxConfig};

/// Render a document to USX with a fresh renderer.
pub fn to_usx(doc: &Document, config: &UsxConfig) -> Result<RenderResult> {
    let mut renderer = UsxRenderer::new(config.clone());
    renderer.render_with_stats(doc)
}

/// USX renderer.
///
/// Unrenderable tag identifiers accumulate across calls on the same
/// instance; call [`UsxRenderer::clear_unrenderable_tags`] between
/// documents, or use a fresh renderer per document.
#[derive(Debug, Clone, Default)]
pub struct UsxRenderer {
    config: UsxConfig,
    unrenderable_tags: Vec<String>,
}

/// One pending step of the explicit-stack walk.
enum Frame<'a> {
    Enter(&'a Marker),
    Close(&'static str),
}

/// Output of a successful walk, committed to the renderer only on success.
struct Rendered {
    content: String,
    unrenderable_tags: Vec<String>,
    stats: RenderStats,
}

impl UsxRenderer {
    /// Create a new USX renderer.
    pub fn new(config: UsxConfig) -> Self {
        Self {
            config,
            unrenderable_tags: Vec::new(),
        }
    }

    /// Render a document to USX markup.
    pub fn render(&mut self, doc: &Document) -> Result<String> {
        let rendered = self.render_internal(doc)?;
        self.commit_unrenderable(&rendered.unrenderable_tags);
        Ok(rendered.content)
    }

    /// Render a document and return markup, diagnostics and, when the
    /// configuration asks for them, statistics.
    pub fn render_with_stats(&mut self, doc: &Document) -> Result<RenderResult> {
        let rendered = self.render_internal(doc)?;
        self.commit_unrenderable(&rendered.unrenderable_tags);

        let result = RenderResult::new(rendered.content, rendered.unrenderable_tags);
        if self.config.collect_stats {
            Ok(result.with_stats(rendered.stats))
        } else {
            Ok(result)
        }
    }

    /// Tag identifiers without an emission rule seen so far, in first-seen
    /// order.
    pub fn unrenderable_tags(&self) -> &[String] {
        &self.unrenderable_tags
    }

    /// Forget the unrenderable tags collected by earlier renders.
    pub fn clear_unrenderable_tags(&mut self) {
        self.unrenderable_tags.clear();
    }

    fn commit_unrenderable(&mut self, tags: &[String]) {
        for tag in tags {
            if !self.unrenderable_tags.contains(tag) {
                self.unrenderable_tags.push(tag.clone());
            }
        }
    }

    fn render_internal(&self, doc: &Document) -> Result<Rendered> {
        let rules = self.config.schema_version.rules();
        let encoding = doc.encoding();
        log::debug!(
            "rendering {} top-level markers as USX {} (encoding: {:?})",
            doc.contents.len(),
            rules.version(),
            encoding
        );

        let mut output = String::new();
        let mut unrenderable_tags: Vec<String> = Vec::new();
        let mut stats = RenderStats::new();
        let mut ctx = RenderContext::new();

        if !self.config.partial_output {
            match encoding {
                Some(encoding) => output.push_str(&format!(
                    "<?xml version=\"1.0\" encoding=\"{}\"?>\n",
                    super::escape::escape_attr(encoding)
                )),
                None => output.push_str("<?xml version=\"1.0\"?>\n"),
            }
            output.push_str(&format!("<usx version=\"{}\">\n", rules.version()));
        }

        // Children are pushed in reverse so they pop in document order
        let mut stack: Vec<Frame<'_>> = doc.contents.iter().rev().map(Frame::Enter).collect();

        while let Some(frame) = stack.pop() {
            let marker = match frame {
                Frame::Close(tag) => {
                    output.push_str(tag);
                    continue;
                }
                Frame::Enter(marker) => marker,
            };

            match emit(marker, &mut ctx, rules, &mut output)? {
                Visit::Leaf => {
                    if self.config.collect_stats {
                        stats.record(&marker.kind);
                    }
                }
                Visit::Children { close } => {
                    if self.config.collect_stats {
                        stats.record(&marker.kind);
                    }
                    if !close.is_empty() {
                        stack.push(Frame::Close(close));
                    }
                    stack.extend(marker.contents.iter().rev().map(Frame::Enter));
                }
                Visit::Unrenderable => {
                    let identifier = marker.identifier();
                    log::warn!(
                        "no USX rendering for \\{}; skipping it and {} child marker(s)",
                        identifier,
                        marker.contents.len()
                    );
                    if self.config.collect_stats {
                        stats.record_unrenderable();
                    }
                    if !unrenderable_tags.iter().any(|t| t == identifier) {
                        unrenderable_tags.push(identifier.to_string());
                    }
                }
            }
        }

        ctx.close_all(rules, &mut output);

        if !self.config.partial_output {
            output.push_str("</usx>\n");
        }

        Ok(Rendered {
            content: output,
            unrenderable_tags,
            stats,
        })
    }
}
