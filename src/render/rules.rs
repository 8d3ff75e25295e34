//! Per-marker USX emission rules.
//!
//! [`emit`] writes the opening fragment for one marker and tells the walker
//! what to do with the marker's children. The match over [`MarkerKind`] is
//! exhaustive: adding a marker kind to the model fails to compile until it
//! is given a rule here or listed as unrenderable.

use crate::error::{Error, Result};
use crate::model::{Marker, MarkerKind};

use super::context::RenderContext;
use super::escape::{escape_attr, escape_text};
use super::schema::SchemaRules;

/// What the walker does after a marker's opening fragment is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visit {
    /// Children are not visited.
    Leaf,
    /// Children are visited, then `close` is written.
    Children { close: &'static str },
    /// No emission rule: nothing was written and children are dropped.
    Unrenderable,
}

impl Visit {
    fn descend() -> Self {
        Visit::Children { close: "" }
    }
}

/// Write the opening fragment for `marker` and update `ctx`.
pub(crate) fn emit(
    marker: &Marker,
    ctx: &mut RenderContext,
    rules: &dyn SchemaRules,
    out: &mut String,
) -> Result<Visit> {
    use MarkerKind::*;

    let id = marker.identifier();
    let visit = match &marker.kind {
        Text { text } => {
            out.push_str(&escape_text(text));
            Visit::Leaf
        }

        Id { text_identifier } => {
            let (code, label) = split_book_identifier(text_identifier)?;
            ctx.enter_book(code, rules, out);
            out.push_str(&format!(
                "<book style=\"{}\" code=\"{}\">{}</book>\n",
                id,
                escape_attr(code),
                escape_text(label)
            ));
            Visit::Leaf
        }

        C { number } => {
            let sid = ctx.enter_chapter(*number, rules, out);
            out.push_str(&rules.chapter_start(id, *number, &sid));
            Visit::descend()
        }

        V { verse_number } => {
            let sid = ctx.enter_verse(verse_number, rules, out);
            out.push_str(&rules.verse_start(id, verse_number, &sid));
            Visit::descend()
        }

        // Metadata paragraphs: the field is the whole content
        Ide { encoding } => {
            para_with_text(out, id, encoding);
            Visit::Leaf
        }
        Usfm { version } => {
            para_with_text(out, id, version);
            Visit::Leaf
        }
        H { header_text } => {
            para_with_text(out, id, header_text);
            Visit::Leaf
        }
        Sp { speaker } => {
            para_with_text(out, id, speaker);
            Visit::Leaf
        }
        Imt {
            weight,
            intro_title,
        } => {
            para_with_text(out, &leveled(id, *weight), intro_title);
            Visit::Leaf
        }

        // Heading paragraphs: children follow the para
        Toc1 {
            long_table_of_contents_text: text,
        }
        | Toc2 {
            short_table_of_contents_text: text,
        }
        | Toc3 {
            book_abbreviation: text,
        }
        | D { description: text } => {
            para_with_text(out, id, text);
            Visit::descend()
        }
        Mt {
            weight,
            title: text,
        }
        | Ms {
            weight,
            heading: text,
        }
        | S { weight, text } => {
            para_with_text(out, &leveled(id, *weight), text);
            Visit::descend()
        }

        // Container paragraphs
        P | Qc | Qr | R => open_para(out, id),
        Pi { depth } | Q { depth } | Qm { depth } | Li { depth } => {
            open_para(out, &leveled(id, *depth))
        }
        B => {
            out.push_str(&format!("<para style=\"{}\"></para>\n", id));
            Visit::Leaf
        }

        // Character styles
        Bd | Bdit | Em | It | Nd | No | Sc | Add | Tl | Pn | Qs | Fq | Fqa | Ft | Fp | Xt => {
            open_char(out, id, "")
        }
        Fk {
            foot_note_keyword: text,
        }
        | Fr {
            verse_reference: text,
        }
        | Xo { origin_ref: text } => open_char(out, id, text),
        W { term, attributes } => {
            out.push_str(&format!(
                "<char style=\"{}\"{}>{}",
                id,
                rules.word_attributes(attributes),
                escape_text(term)
            ));
            Visit::Children { close: "</char>" }
        }

        // Notes
        F {
            foot_note_caller: caller,
        }
        | X {
            cross_ref_caller: caller,
        } => {
            out.push_str(&format!(
                "<note style=\"{}\" caller=\"{}\">",
                id,
                escape_attr(caller)
            ));
            Visit::Children { close: "</note>" }
        }

        // Tables
        TableBlock => {
            out.push_str("<table>\n");
            Visit::Children { close: "</table>\n" }
        }
        Tr => {
            out.push_str(&format!("<row style=\"{}\">", id));
            Visit::Children { close: "</row>\n" }
        }
        Tc { column_position } | Th { column_position } => {
            open_cell(out, id, *column_position, "start")
        }
        Tcr { column_position } | Thr { column_position } => {
            open_cell(out, id, *column_position, "end")
        }

        // Closers consumed by their opening marker
        AddEnd | BdEnd | BditEnd | BkEnd | EmEnd | FEnd | FvEnd | IorEnd | ItEnd | NdEnd
        | NoEnd | PnEnd | QacEnd | QsEnd | RqEnd | ScEnd | SupEnd | TlEnd | WEnd | XEnd | Vp
        | VpEnd | Nb => Visit::Leaf,

        Ip | Is { .. } | M | Mi | Pc | Cl { .. } | Cp { .. } | Ca | Va | Qa { .. } | Qac | Rq
        | Sup | Bk | Ior | Fv | Fig | Rem { .. } | Unknown { .. } => Visit::Unrenderable,
    };

    Ok(visit)
}

/// Split `\id` text into the 3-character book code and the label that
/// follows the separator.
pub(crate) fn split_book_identifier(text_identifier: &str) -> Result<(&str, &str)> {
    let mut boundaries = text_identifier
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text_identifier.len()));

    let code_end = boundaries.nth(3);
    let label_start = boundaries.next();

    match (code_end, label_start) {
        (Some(code_end), Some(label_start)) => Ok((
            &text_identifier[..code_end],
            &text_identifier[label_start..],
        )),
        _ => Err(Error::MalformedBookIdentifier(text_identifier.to_string())),
    }
}

fn leveled(id: &str, level: u8) -> String {
    format!("{}{}", id, level)
}

fn para_with_text(out: &mut String, style: &str, text: &str) {
    out.push_str(&format!(
        "<para style=\"{}\">{}</para>\n",
        style,
        escape_text(text)
    ));
}

fn open_para(out: &mut String, style: &str) -> Visit {
    out.push_str(&format!("<para style=\"{}\">", style));
    Visit::Children {
        close: "</para>\n",
    }
}

fn open_char(out: &mut String, style: &str, text: &str) -> Visit {
    out.push_str(&format!("<char style=\"{}\">{}", style, escape_text(text)));
    Visit::Children { close: "</char>" }
}

fn open_cell(out: &mut String, id: &str, column: u8, align: &str) -> Visit {
    out.push_str(&format!(
        "<cell style=\"{}\" align=\"{}\">",
        leveled(id, column),
        align
    ));
    Visit::Children { close: "</cell>" }
}
