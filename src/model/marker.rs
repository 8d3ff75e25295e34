//! Marker node types.
//!
//! A [`Marker`] pairs a [`MarkerKind`] (the typed USFM tag plus its inline
//! fields) with the ordered child markers the parser nested beneath it.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// One node of the parsed USFM tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// The tag and its fields
    #[serde(flatten)]
    pub kind: MarkerKind,

    /// Child markers in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<Marker>,
}

impl Marker {
    /// Create a marker with no children.
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            contents: Vec::new(),
        }
    }

    /// Create a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MarkerKind::Text { text: text.into() })
    }

    /// Create a marker with the given children.
    pub fn with_contents(kind: MarkerKind, contents: Vec<Marker>) -> Self {
        Self { kind, contents }
    }

    /// Append a child marker.
    pub fn push(&mut self, child: Marker) {
        self.contents.push(child);
    }

    /// Builder-style variant of [`Marker::push`].
    pub fn child(mut self, child: Marker) -> Self {
        self.contents.push(child);
        self
    }

    /// The USFM tag name of this marker.
    pub fn identifier(&self) -> &str {
        self.kind.identifier()
    }
}

impl From<MarkerKind> for Marker {
    fn from(kind: MarkerKind) -> Self {
        Marker::new(kind)
    }
}

/// Pre-order iterator over a marker subtree.
///
/// Uses an explicit stack, so deeply nested trees do not grow the call stack.
pub struct Descendants<'a> {
    stack: Vec<&'a Marker>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn from_roots(roots: &'a [Marker]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Marker;

    fn next(&mut self) -> Option<Self::Item> {
        let marker = self.stack.pop()?;
        self.stack.extend(marker.contents.iter().rev());
        Some(marker)
    }
}

fn default_level() -> u8 {
    1
}

/// The typed USFM tag of a marker.
///
/// In JSON the variant is selected by the `"marker"` key, which holds the
/// USFM identifier (`"c"`, `"v"`, `"nd*"`, ...). A `"marker"` value that
/// names none of the variants loads as [`MarkerKind::Unknown`] carrying
/// that identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "marker")]
pub enum MarkerKind {
    // ---- Identification ----
    /// `\id`: book code, a separator, then a free-text label
    #[serde(rename = "id")]
    Id { text_identifier: String },
    /// `\ide`: character encoding of the source
    #[serde(rename = "ide")]
    Ide { encoding: String },
    /// `\usfm`: USFM version of the source
    #[serde(rename = "usfm")]
    Usfm { version: String },
    /// `\h`: running header
    #[serde(rename = "h")]
    H { header_text: String },
    #[serde(rename = "toc1")]
    Toc1 { long_table_of_contents_text: String },
    #[serde(rename = "toc2")]
    Toc2 { short_table_of_contents_text: String },
    #[serde(rename = "toc3")]
    Toc3 { book_abbreviation: String },

    // ---- Titles and headings ----
    #[serde(rename = "mt")]
    Mt {
        #[serde(default = "default_level")]
        weight: u8,
        title: String,
    },
    #[serde(rename = "imt")]
    Imt {
        #[serde(default = "default_level")]
        weight: u8,
        intro_title: String,
    },
    #[serde(rename = "ms")]
    Ms {
        #[serde(default = "default_level")]
        weight: u8,
        heading: String,
    },
    #[serde(rename = "s")]
    S {
        #[serde(default = "default_level")]
        weight: u8,
        text: String,
    },
    /// `\d`: descriptive title (Psalm superscription)
    #[serde(rename = "d")]
    D { description: String },
    /// `\sp`: speaker identification
    #[serde(rename = "sp")]
    Sp { speaker: String },
    /// `\r`: parallel passage reference
    #[serde(rename = "r")]
    R,

    // ---- Paragraphs and poetry ----
    #[serde(rename = "p")]
    P,
    #[serde(rename = "pi")]
    Pi {
        #[serde(default = "default_level")]
        depth: u8,
    },
    #[serde(rename = "q")]
    Q {
        #[serde(default = "default_level")]
        depth: u8,
    },
    #[serde(rename = "qm")]
    Qm {
        #[serde(default = "default_level")]
        depth: u8,
    },
    #[serde(rename = "qc")]
    Qc,
    #[serde(rename = "qr")]
    Qr,
    #[serde(rename = "li")]
    Li {
        #[serde(default = "default_level")]
        depth: u8,
    },
    /// `\b`: blank line
    #[serde(rename = "b")]
    B,

    // ---- Chapters, verses, text ----
    #[serde(rename = "c")]
    C { number: u32 },
    #[serde(rename = "v")]
    V { verse_number: String },
    /// Literal prose; always a leaf
    #[serde(rename = "text")]
    Text { text: String },

    // ---- Character styles ----
    #[serde(rename = "bd")]
    Bd,
    #[serde(rename = "bdit")]
    Bdit,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "it")]
    It,
    /// `\nd`: name of deity
    #[serde(rename = "nd")]
    Nd,
    #[serde(rename = "no")]
    No,
    #[serde(rename = "sc")]
    Sc,
    /// `\add`: translator's addition
    #[serde(rename = "add")]
    Add,
    /// `\tl`: transliterated word
    #[serde(rename = "tl")]
    Tl,
    /// `\pn`: proper name
    #[serde(rename = "pn")]
    Pn,
    /// `\qs`: selah
    #[serde(rename = "qs")]
    Qs,
    /// `\w`: wordlist entry with optional word-level attributes
    #[serde(rename = "w")]
    W {
        term: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
    },

    // ---- Footnotes ----
    #[serde(rename = "f")]
    F { foot_note_caller: String },
    #[serde(rename = "fk")]
    Fk { foot_note_keyword: String },
    #[serde(rename = "fr")]
    Fr { verse_reference: String },
    #[serde(rename = "fq")]
    Fq,
    #[serde(rename = "fqa")]
    Fqa,
    #[serde(rename = "ft")]
    Ft,
    #[serde(rename = "fp")]
    Fp,

    // ---- Cross references ----
    #[serde(rename = "x")]
    X { cross_ref_caller: String },
    #[serde(rename = "xo")]
    Xo { origin_ref: String },
    #[serde(rename = "xt")]
    Xt,

    // ---- Tables ----
    #[serde(rename = "table")]
    TableBlock,
    #[serde(rename = "tr")]
    Tr,
    #[serde(rename = "tc")]
    Tc {
        #[serde(default = "default_level")]
        column_position: u8,
    },
    #[serde(rename = "tcr")]
    Tcr {
        #[serde(default = "default_level")]
        column_position: u8,
    },
    #[serde(rename = "th")]
    Th {
        #[serde(default = "default_level")]
        column_position: u8,
    },
    #[serde(rename = "thr")]
    Thr {
        #[serde(default = "default_level")]
        column_position: u8,
    },

    // ---- Closing markers left in the tree by the parser ----
    #[serde(rename = "add*")]
    AddEnd,
    #[serde(rename = "bd*")]
    BdEnd,
    #[serde(rename = "bdit*")]
    BditEnd,
    #[serde(rename = "bk*")]
    BkEnd,
    #[serde(rename = "em*")]
    EmEnd,
    #[serde(rename = "f*")]
    FEnd,
    #[serde(rename = "fv*")]
    FvEnd,
    #[serde(rename = "ior*")]
    IorEnd,
    #[serde(rename = "it*")]
    ItEnd,
    #[serde(rename = "nd*")]
    NdEnd,
    #[serde(rename = "no*")]
    NoEnd,
    #[serde(rename = "pn*")]
    PnEnd,
    #[serde(rename = "qac*")]
    QacEnd,
    #[serde(rename = "qs*")]
    QsEnd,
    #[serde(rename = "rq*")]
    RqEnd,
    #[serde(rename = "sc*")]
    ScEnd,
    #[serde(rename = "sup*")]
    SupEnd,
    #[serde(rename = "tl*")]
    TlEnd,
    #[serde(rename = "w*")]
    WEnd,
    #[serde(rename = "x*")]
    XEnd,
    /// `\vp`: published verse character; its text travels with the verse
    #[serde(rename = "vp")]
    Vp,
    #[serde(rename = "vp*")]
    VpEnd,
    /// `\nb`: paragraph continuation flag
    #[serde(rename = "nb")]
    Nb,

    // ---- Parsed but without a USX rendering ----
    #[serde(rename = "ip")]
    Ip,
    #[serde(rename = "is")]
    Is {
        #[serde(default = "default_level")]
        weight: u8,
    },
    #[serde(rename = "m")]
    M,
    #[serde(rename = "mi")]
    Mi,
    #[serde(rename = "pc")]
    Pc,
    #[serde(rename = "cl")]
    Cl { label: String },
    #[serde(rename = "cp")]
    Cp { published_chapter_marker: String },
    #[serde(rename = "ca")]
    Ca,
    #[serde(rename = "va")]
    Va,
    #[serde(rename = "qa")]
    Qa { heading: String },
    #[serde(rename = "qac")]
    Qac,
    #[serde(rename = "rq")]
    Rq,
    #[serde(rename = "sup")]
    Sup,
    #[serde(rename = "bk")]
    Bk,
    #[serde(rename = "ior")]
    Ior,
    #[serde(rename = "fv")]
    Fv,
    #[serde(rename = "fig")]
    Fig,
    #[serde(rename = "rem")]
    Rem { comment: String },

    /// Any tag the parser kept but does not model.
    #[serde(rename = "unknown")]
    Unknown { identifier: String },
}

impl MarkerKind {
    /// The USFM tag name, without depth or weight suffix.
    pub fn identifier(&self) -> &str {
        use MarkerKind::*;
        match self {
            Id { .. } => "id",
            Ide { .. } => "ide",
            Usfm { .. } => "usfm",
            H { .. } => "h",
            Toc1 { .. } => "toc1",
            Toc2 { .. } => "toc2",
            Toc3 { .. } => "toc3",
            Mt { .. } => "mt",
            Imt { .. } => "imt",
            Ms { .. } => "ms",
            S { .. } => "s",
            D { .. } => "d",
            Sp { .. } => "sp",
            R => "r",
            P => "p",
            Pi { .. } => "pi",
            Q { .. } => "q",
            Qm { .. } => "qm",
            Qc => "qc",
            Qr => "qr",
            Li { .. } => "li",
            B => "b",
            C { .. } => "c",
            V { .. } => "v",
            Text { .. } => "text",
            Bd => "bd",
            Bdit => "bdit",
            Em => "em",
            It => "it",
            Nd => "nd",
            No => "no",
            Sc => "sc",
            Add => "add",
            Tl => "tl",
            Pn => "pn",
            Qs => "qs",
            W { .. } => "w",
            F { .. } => "f",
            Fk { .. } => "fk",
            Fr { .. } => "fr",
            Fq => "fq",
            Fqa => "fqa",
            Ft => "ft",
            Fp => "fp",
            X { .. } => "x",
            Xo { .. } => "xo",
            Xt => "xt",
            TableBlock => "table",
            Tr => "tr",
            Tc { .. } => "tc",
            Tcr { .. } => "tcr",
            Th { .. } => "th",
            Thr { .. } => "thr",
            AddEnd => "add*",
            BdEnd => "bd*",
            BditEnd => "bdit*",
            BkEnd => "bk*",
            EmEnd => "em*",
            FEnd => "f*",
            FvEnd => "fv*",
            IorEnd => "ior*",
            ItEnd => "it*",
            NdEnd => "nd*",
            NoEnd => "no*",
            PnEnd => "pn*",
            QacEnd => "qac*",
            QsEnd => "qs*",
            RqEnd => "rq*",
            ScEnd => "sc*",
            SupEnd => "sup*",
            TlEnd => "tl*",
            WEnd => "w*",
            XEnd => "x*",
            Vp => "vp",
            VpEnd => "vp*",
            Nb => "nb",
            Ip => "ip",
            Is { .. } => "is",
            M => "m",
            Mi => "mi",
            Pc => "pc",
            Cl { .. } => "cl",
            Cp { .. } => "cp",
            Ca => "ca",
            Va => "va",
            Qa { .. } => "qa",
            Qac => "qac",
            Rq => "rq",
            Sup => "sup",
            Bk => "bk",
            Ior => "ior",
            Fv => "fv",
            Fig => "fig",
            Rem { .. } => "rem",
            Unknown { identifier } => identifier.as_str(),
        }
    }
}

/// Every `"marker"` value with a variant of its own.
const MODELED_IDENTIFIERS: &[&str] = &[
    "id", "ide", "usfm", "h", "toc1", "toc2", "toc3", "mt", "imt", "ms", "s", "d", "sp", "r",
    "p", "pi", "q", "qm", "qc", "qr", "li", "b", "c", "v", "text", "bd", "bdit", "em", "it",
    "nd", "no", "sc", "add", "tl", "pn", "qs", "w", "f", "fk", "fr", "fq", "fqa", "ft", "fp",
    "x", "xo", "xt", "table", "tr", "tc", "tcr", "th", "thr", "add*", "bd*", "bdit*", "bk*",
    "em*", "f*", "fv*", "ior*", "it*", "nd*", "no*", "pn*", "qac*", "qs*", "rq*", "sc*",
    "sup*", "tl*", "w*", "x*", "vp", "vp*", "nb", "ip", "is", "m", "mi", "pc", "cl", "cp",
    "ca", "va", "qa", "qac", "rq", "sup", "bk", "ior", "fv", "fig", "rem", "unknown",
];

impl Serialize for MarkerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MarkerKind::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for MarkerKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let identifier = value
            .get("marker")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| D::Error::missing_field("marker"))?;

        // Tags the parser emits but this model does not know are kept so the
        // renderer can report them.
        if !MODELED_IDENTIFIERS.contains(&identifier) {
            return Ok(MarkerKind::Unknown {
                identifier: identifier.to_string(),
            });
        }

        MarkerKind::deserialize(value).map_err(D::Error::custom)
    }
}
