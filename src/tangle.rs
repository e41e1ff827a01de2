//! Parsing pipeline for the tangle format
//!
//! Text flows strictly forward through the pipeline: source text is lexed
//! into a token stream ([`lexer`]), the token stream is parsed into a
//! document tree ([`parser`]), and any failure along the way is translated
//! into uniform [`diagnostics`]. Lexing is a complete pre-pass: if it finds
//! any error the parser never runs, and all lex errors are reported
//! together. Parsing is fail-fast: the first mismatched token rejects the
//! whole document.

pub mod diagnostics;
pub mod formats;
pub mod lexer;
pub mod parser;

use diagnostics::Diagnostic;
use parser::ast::Document;

/// Outcome of a [`parse`] call.
///
/// A document is either fully valid or entirely rejected; there is no
/// warning tier. `document` is `Some` exactly when `diagnostics` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// The parsed document, absent when any diagnostic was produced
    pub document: Option<Document>,
    /// All lex errors, or the single parse error that aborted parsing
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse tangle source text into a document tree.
///
/// This is the public entry point of the crate. It is a pure function of
/// its input: no I/O, no global mutable state, safe to call concurrently.
pub fn parse(source: &str) -> ParseResult {
    let tokens = match lexer::tokenize(source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            return ParseResult {
                document: None,
                diagnostics: diagnostics::from_lex_errors(&errors, source),
            }
        }
    };

    match parser::parse_document(&tokens, source) {
        Ok(document) => ParseResult {
            document: Some(document),
            diagnostics: Vec::new(),
        },
        Err(error) => ParseResult {
            document: None,
            diagnostics: vec![diagnostics::from_parse_error(&error, source)],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_returns_document_without_diagnostics() {
        let result = parse("foo 1 2");
        assert!(result.document.is_some());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_lex_failure_yields_no_document() {
        let result = parse("\"abc");
        assert!(result.document.is_none());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_grammar_failure_yields_no_document() {
        let result = parse("foo {} {}");
        assert!(result.document.is_none());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        let result = parse("");
        let document = result.document.expect("empty input is a valid document");
        assert!(document.nodes.is_empty());
    }
}
