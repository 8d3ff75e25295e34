//! Error types for the USX renderer.

use std::io;
use thiserror::Error;

/// Result type alias for USX rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or rendering a marker tree.
///
/// Markers without an emission rule are not errors; they are reported
/// through the renderer's unrenderable tag list instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The marker tree could not be read from or written to JSON.
    #[error("Marker tree JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested USX schema version is not one of "2.5" or "3.0".
    #[error("Unsupported USX version: {0}")]
    UnsupportedSchemaVersion(String),

    /// The `\id` text is too short to hold a book code and a label.
    #[error("Malformed book identifier: {0:?} (expected a 3-letter code, a separator and a label)")]
    MalformedBookIdentifier(String),
}
