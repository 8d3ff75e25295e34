//! Dialect-specific emission rules.
//!
//! USX 2.5 and 3.0 differ in how chapters, verses and word-level
//! attributes are written. Each dialect implements [`SchemaRules`]; the
//! renderer picks one implementation per render through
//! [`SchemaVersion::rules`](super::SchemaVersion::rules) and never branches
//! on the version string again.

use std::collections::BTreeMap;

use super::escape::escape_attr;
use super::SchemaVersion;

/// Formatting capabilities that vary between USX dialects.
pub trait SchemaRules: Send + Sync {
    /// The dialect these rules implement.
    fn version(&self) -> SchemaVersion;

    /// Whether chapters and verses are written as sid/eid milestone pairs.
    fn pairs_milestones(&self) -> bool;

    /// Opening tag for a chapter. `sid` is ignored by unpaired dialects.
    fn chapter_start(&self, style: &str, number: u32, sid: &str) -> String;

    /// Opening tag for a verse. `sid` is ignored by unpaired dialects.
    fn verse_start(&self, style: &str, number: &str, sid: &str) -> String;

    /// Closing milestone for `element` (`"chapter"` or `"verse"`), if the
    /// dialect writes one.
    fn milestone_end(&self, element: &str, eid: &str) -> Option<String>;

    /// Extra attributes written on a `\w` character span.
    fn word_attributes(&self, attributes: &BTreeMap<String, String>) -> String;
}

/// USX 2.5 rules: unpaired chapter and verse tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Usx25Rules;

impl SchemaRules for Usx25Rules {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V2_5
    }

    fn pairs_milestones(&self) -> bool {
        false
    }

    fn chapter_start(&self, style: &str, number: u32, _sid: &str) -> String {
        format!("<chapter style=\"{}\" number=\"{}\" />\n", style, number)
    }

    fn verse_start(&self, style: &str, number: &str, _sid: &str) -> String {
        format!(
            "<verse style=\"{}\" number=\"{}\" />",
            style,
            escape_attr(number)
        )
    }

    fn milestone_end(&self, _element: &str, _eid: &str) -> Option<String> {
        None
    }

    fn word_attributes(&self, _attributes: &BTreeMap<String, String>) -> String {
        String::new()
    }
}

/// USX 3.0 rules: sid/eid milestone pairs and word-level attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Usx30Rules;

impl SchemaRules for Usx30Rules {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V3_0
    }

    fn pairs_milestones(&self) -> bool {
        true
    }

    fn chapter_start(&self, style: &str, number: u32, sid: &str) -> String {
        format!(
            "<chapter style=\"{}\" number=\"{}\" sid=\"{}\" />\n",
            style,
            number,
            escape_attr(sid)
        )
    }

    fn verse_start(&self, style: &str, number: &str, sid: &str) -> String {
        format!(
            "<verse style=\"{}\" number=\"{}\" sid=\"{}\" />",
            style,
            escape_attr(number),
            escape_attr(sid)
        )
    }

    fn milestone_end(&self, element: &str, eid: &str) -> Option<String> {
        let newline = if element == "chapter" { "\n" } else { "" };
        Some(format!(
            "<{} eid=\"{}\" />{}",
            element,
            escape_attr(eid),
            newline
        ))
    }

    fn word_attributes(&self, attributes: &BTreeMap<String, String>) -> String {
        attributes
            .iter()
            .filter(|(name, _)| {
                let usable = is_word_attribute_name(name);
                if !usable {
                    log::warn!("dropping \\w attribute {:?}: not a usable XML name", name);
                }
                usable
            })
            .map(|(name, value)| format!(" {}=\"{}\"", name, escape_attr(value)))
            .collect()
    }
}

/// An XML name (without namespace prefix) other than `style`, which the
/// renderer already writes on every `\w` span.
fn is_word_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && name != "style"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usx25_has_no_milestone_ids() {
        let rules = Usx25Rules;
        let chapter = rules.chapter_start("c", 1, "GEN 1");
        assert_eq!(chapter, "<chapter style=\"c\" number=\"1\" />\n");
        assert!(!rules.verse_start("v", "1", "GEN 1:1").contains("sid"));
        assert_eq!(rules.milestone_end("verse", "GEN 1:1"), None);
        assert!(!rules.pairs_milestones());
    }

    #[test]
    fn test_usx30_milestones() {
        let rules = Usx30Rules;
        assert_eq!(
            rules.chapter_start("c", 2, "EXO 2"),
            "<chapter style=\"c\" number=\"2\" sid=\"EXO 2\" />\n"
        );
        assert_eq!(
            rules.verse_start("v", "3", "EXO 2:3"),
            "<verse style=\"v\" number=\"3\" sid=\"EXO 2:3\" />"
        );
        assert_eq!(
            rules.milestone_end("chapter", "EXO 2").as_deref(),
            Some("<chapter eid=\"EXO 2\" />\n")
        );
        assert_eq!(
            rules.milestone_end("verse", "EXO 2:3").as_deref(),
            Some("<verse eid=\"EXO 2:3\" />")
        );
    }

    #[test]
    fn test_word_attributes() {
        let mut attributes = BTreeMap::new();
        attributes.insert("strong".to_string(), "H0430".to_string());
        attributes.insert("lemma".to_string(), "grace".to_string());

        assert_eq!(
            Usx30Rules.word_attributes(&attributes),
            " lemma=\"grace\" strong=\"H0430\""
        );
        assert_eq!(Usx25Rules.word_attributes(&attributes), "");
    }

    #[test]
    fn test_word_attributes_skip_unusable_names() {
        let mut attributes = BTreeMap::new();
        attributes.insert("style".to_string(), "x".to_string());
        attributes.insert("a b\"".to_string(), "y".to_string());
        attributes.insert("x-morph".to_string(), "He,Ncmpa".to_string());
        attributes.insert("1st".to_string(), "z".to_string());
        attributes.insert("xml:lang".to_string(), "he".to_string());
        attributes.insert(String::new(), "empty".to_string());

        assert_eq!(
            Usx30Rules.word_attributes(&attributes),
            " x-morph=\"He,Ncmpa\""
        );
    }

    #[test]
    fn test_word_attribute_values_escaped() {
        let mut attributes = BTreeMap::new();
        attributes.insert("gloss".to_string(), "\"a\" & <b>".to_string());
        assert_eq!(
            Usx30Rules.word_attributes(&attributes),
            " gloss=\"&quot;a&quot; &amp; &lt;b&gt;\""
        );
    }

    #[test]
    fn test_rules_report_version() {
        assert_eq!(SchemaVersion::V2_5.rules().version(), SchemaVersion::V2_5);
        assert_eq!(SchemaVersion::V3_0.rules().version(), SchemaVersion::V3_0);
    }
}
