//! Book, chapter and verse state tracked during a render.

use super::schema::SchemaRules;

/// Mutable state threaded through one render call.
///
/// A fresh context is created for every render, so renders of different
/// documents never observe each other's position.
#[derive(Debug, Clone)]
pub struct RenderContext {
    book_code: Option<String>,
    chapter: u32,
    verse: String,
    open_chapter: Option<String>,
    open_verse: Option<String>,
}

impl RenderContext {
    /// Create the state for the start of a document.
    pub fn new() -> Self {
        Self {
            book_code: None,
            chapter: 1,
            verse: "1".to_string(),
            open_chapter: None,
            open_verse: None,
        }
    }

    /// Current book code, if an `\id` marker has been seen.
    pub fn book_code(&self) -> Option<&str> {
        self.book_code.as_deref()
    }

    /// Current chapter number (1 before any `\c`).
    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// Current verse number ("1" before any `\v`).
    pub fn verse(&self) -> &str {
        &self.verse
    }

    /// Enter a new book. Milestones of the previous book are closed first.
    pub fn enter_book(&mut self, code: &str, rules: &dyn SchemaRules, output: &mut String) {
        self.close_all(rules, output);
        self.book_code = Some(code.to_string());
    }

    /// Enter chapter `number` and return its milestone id.
    ///
    /// Any open verse and chapter milestones are closed before the new
    /// chapter opens.
    pub fn enter_chapter(
        &mut self,
        number: u32,
        rules: &dyn SchemaRules,
        output: &mut String,
    ) -> String {
        self.close_all(rules, output);
        self.chapter = number;

        let sid = self.reference(&number.to_string());
        if rules.pairs_milestones() {
            self.open_chapter = Some(sid.clone());
        }
        sid
    }

    /// Enter verse `number` and return its milestone id.
    ///
    /// Any open verse milestone is closed before the new verse opens.
    pub fn enter_verse(
        &mut self,
        number: &str,
        rules: &dyn SchemaRules,
        output: &mut String,
    ) -> String {
        self.close_verse(rules, output);
        self.verse = number.to_string();

        let sid = self.reference(&format!("{}:{}", self.chapter, number));
        if rules.pairs_milestones() {
            self.open_verse = Some(sid.clone());
        }
        sid
    }

    /// Close every open milestone, verse before chapter.
    pub fn close_all(&mut self, rules: &dyn SchemaRules, output: &mut String) {
        self.close_verse(rules, output);
        if let Some(eid) = self.open_chapter.take() {
            log::trace!("closing chapter milestone {}", eid);
            if let Some(tag) = rules.milestone_end("chapter", &eid) {
                output.push_str(&tag);
            }
        }
    }

    fn close_verse(&mut self, rules: &dyn SchemaRules, output: &mut String) {
        if let Some(eid) = self.open_verse.take() {
            log::trace!("closing verse milestone {}", eid);
            if let Some(tag) = rules.milestone_end("verse", &eid) {
                output.push_str(&tag);
            }
        }
    }

    /// `"{book} {location}"`, or just the location before any `\id`.
    fn reference(&self, location: &str) -> String {
        match self.book_code.as_deref() {
            Some(code) if !code.is_empty() => format!("{} {}", code, location),
            _ => location.to_string(),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::schema::{Usx25Rules, Usx30Rules};

    #[test]
    fn test_defaults() {
        let ctx = RenderContext::new();
        assert_eq!(ctx.book_code(), None);
        assert_eq!(ctx.chapter(), 1);
        assert_eq!(ctx.verse(), "1");
    }

    #[test]
    fn test_milestone_ids() {
        let mut ctx = RenderContext::new();
        let mut out = String::new();
        ctx.enter_book("GEN", &Usx30Rules, &mut out);

        assert_eq!(ctx.enter_chapter(3, &Usx30Rules, &mut out), "GEN 3");
        assert_eq!(ctx.enter_verse("16", &Usx30Rules, &mut out), "GEN 3:16");
        assert_eq!(ctx.chapter(), 3);
        assert_eq!(ctx.verse(), "16");
        assert!(out.is_empty());
    }

    #[test]
    fn test_close_on_next_open() {
        let mut ctx = RenderContext::new();
        let mut out = String::new();
        ctx.enter_book("GEN", &Usx30Rules, &mut out);
        ctx.enter_chapter(1, &Usx30Rules, &mut out);
        ctx.enter_verse("1", &Usx30Rules, &mut out);
        ctx.enter_verse("2", &Usx30Rules, &mut out);
        assert_eq!(out, "<verse eid=\"GEN 1:1\" />");

        out.clear();
        ctx.enter_chapter(2, &Usx30Rules, &mut out);
        assert_eq!(out, "<verse eid=\"GEN 1:2\" /><chapter eid=\"GEN 1\" />\n");

        out.clear();
        ctx.close_all(&Usx30Rules, &mut out);
        assert_eq!(out, "<chapter eid=\"GEN 2\" />\n");

        out.clear();
        ctx.close_all(&Usx30Rules, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unpaired_dialect_tracks_nothing_open() {
        let mut ctx = RenderContext::new();
        let mut out = String::new();
        ctx.enter_book("GEN", &Usx25Rules, &mut out);
        ctx.enter_chapter(1, &Usx25Rules, &mut out);
        ctx.enter_verse("1", &Usx25Rules, &mut out);
        ctx.close_all(&Usx25Rules, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_reference_without_book() {
        let mut ctx = RenderContext::new();
        let mut out = String::new();
        assert_eq!(ctx.enter_chapter(1, &Usx30Rules, &mut out), "1");
        assert_eq!(ctx.enter_verse("4", &Usx30Rules, &mut out), "1:4");
    }
}
