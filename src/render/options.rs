//! Rendering options and configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::schema::{SchemaRules, Usx25Rules, Usx30Rules};

/// Options for rendering a document to USX.
///
/// The configuration is immutable during a render and may be shared across
/// threads and reused for any number of documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsxConfig {
    /// Omit the XML declaration and the `<usx>` root element
    pub partial_output: bool,

    /// Target USX dialect
    pub schema_version: SchemaVersion,

    /// Collect rendering statistics
    pub collect_stats: bool,
}

impl UsxConfig {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit only the body, for embedding in a larger document.
    pub fn with_partial_output(mut self, partial: bool) -> Self {
        self.partial_output = partial;
        self
    }

    /// Set the target USX dialect.
    pub fn with_schema_version(mut self, version: SchemaVersion) -> Self {
        self.schema_version = version;
        self
    }

    /// Set the target USX dialect from its version string ("2.5" or "3.0").
    pub fn with_schema(self, version: &str) -> Result<Self> {
        Ok(self.with_schema_version(version.parse()?))
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for UsxConfig {
    fn default() -> Self {
        Self {
            partial_output: false,
            schema_version: SchemaVersion::default(),
            collect_stats: false,
        }
    }
}

/// USX schema dialect.
///
/// Only the two published dialects are representable; any other version
/// string is rejected with [`Error::UnsupportedSchemaVersion`] when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaVersion {
    /// USX 2.5: chapters and verses are single unpaired tags
    V2_5,
    /// USX 3.0: chapters and verses are sid/eid milestone pairs
    #[default]
    V3_0,
}

impl SchemaVersion {
    /// The version string written to `<usx version="...">`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V2_5 => "2.5",
            SchemaVersion::V3_0 => "3.0",
        }
    }

    /// Emission rules for this dialect.
    pub fn rules(&self) -> &'static dyn SchemaRules {
        match self {
            SchemaVersion::V2_5 => &Usx25Rules,
            SchemaVersion::V3_0 => &Usx30Rules,
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "2.5" => Ok(SchemaVersion::V2_5),
            "3.0" => Ok(SchemaVersion::V3_0),
            other => Err(Error::UnsupportedSchemaVersion(other.to_string())),
        }
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.as_str().to_string()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
