//! Rendering module for converting marker trees to USX.

mod context;
mod escape;
mod options;
mod result;
mod rules;
pub mod schema;
mod usx;

pub use context::RenderContext;
pub use options::{SchemaVersion, UsxConfig};
pub use result::{RenderResult, RenderStats};
pub use schema::{SchemaRules, Usx25Rules, Usx30Rules};
pub use usx::{to_usx, UsxRenderer};
