//! XML escaping for text content and attribute values.

use quick_xml::escape::{escape, partial_escape};
use std::borrow::Cow;

/// Escape character data. Quotes are left alone.
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    partial_escape(text)
}

/// Escape a value for use inside a double-quoted attribute.
pub(crate) fn escape_attr(value: &str) -> Cow<'_, str> {
    escape(value)
}
