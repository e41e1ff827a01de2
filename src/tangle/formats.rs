//! Output formats for parsed documents
//!
//! The only format offered by the core is a plain JSON rendering of the
//! document tree, useful for debugging and for handing trees to tools that
//! do not link this crate. Re-rendering a document as tangle text is the
//! job of an external serializer, not of this module.

use crate::tangle::parser::ast::Document;

/// Render a document as a JSON value.
pub fn to_json(document: &Document) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(document)
}

/// Render a document as a pretty-printed JSON string.
pub fn to_json_string(document: &Document) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}
