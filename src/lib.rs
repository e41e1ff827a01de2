//! # tangle
//!
//! A parser for the tangle document format.
//!
//! Tangle documents are trees of named nodes carrying positional values,
//! `key=value` properties, optional `(type)` tags, and nested children:
//!
//! ```text
//! package {
//!     name "tangle"
//!     authors "Alice" "Bob"
//!     timeout (u16)250
//!     dependencies platform="linux" {
//!         logos "0.14"
//!     }
//! }
//! ```
//!
//! The whole pipeline is exposed through [`parse`], which takes source text
//! and returns the document tree together with any diagnostics.

pub mod tangle;

pub use tangle::diagnostics::Diagnostic;
pub use tangle::parser::ast::{Document, Node, Tags, Value};
pub use tangle::{parse, ParseResult};
