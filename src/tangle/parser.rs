//! Grammar engine for the tangle format
//!
//! Consumes the token stream produced by [`super::lexer`] and builds the
//! document tree defined in [`ast`]. The grammar is recursive descent with
//! ordered alternatives: every decision commits on one token of lookahead,
//! except the string-vs-property-key ambiguity, which speculates past the
//! string and rolls the cursor back when no `=` follows.

pub mod ast;
pub mod grammar;

pub use grammar::{parse_document, ParseError};
