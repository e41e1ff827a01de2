//! Diagnostic translation for lex and parse failures
//!
//! Both failure kinds are normalized into [`Diagnostic`], the uniform
//! shape handed to callers: a message, the byte span of the offending
//! source, its 1-based line and column, and a short token kind label.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tangle::lexer::LexError;
use crate::tangle::parser::ParseError;

/// A normalized failure report with source position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    /// Byte offset of the offending span
    pub offset: usize,
    /// Byte length of the offending span
    pub length: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters from the line start
    pub column: usize,
    /// Kind label of the offending token or lex failure
    pub token_kind: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Translate the lexer's collected errors, in source order.
pub fn from_lex_errors(errors: &[LexError], source: &str) -> Vec<Diagnostic> {
    let index = LineIndex::new(source);
    errors
        .iter()
        .map(|error| {
            let (line, column) = index.position(source, error.span.start);
            Diagnostic {
                message: error.kind.message().to_string(),
                offset: error.span.start,
                length: error.span.end - error.span.start,
                line,
                column,
                token_kind: error.kind.label().to_string(),
            }
        })
        .collect()
}

/// Translate the single error that aborted parsing.
pub fn from_parse_error(error: &ParseError, source: &str) -> Diagnostic {
    let index = LineIndex::new(source);
    let (line, column) = index.position(source, error.span.start);
    Diagnostic {
        message: error.to_string(),
        offset: error.span.start,
        length: error.span.end - error.span.start,
        line,
        column,
        token_kind: error
            .found
            .as_ref()
            .map(|token| token.kind.label())
            .unwrap_or("end-of-input")
            .to_string(),
    }
}

/// Byte offsets of line starts, built once per translation
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();
        while let Some((_, c)) = chars.next() {
            let broke = match c {
                '\r' => {
                    // CRLF counts as a single break
                    if matches!(chars.peek(), Some((_, '\n'))) {
                        chars.next();
                    }
                    true
                }
                '\n' | '\u{0085}' | '\u{000C}' | '\u{2028}' | '\u{2029}' => true,
                _ => false,
            };
            if broke {
                let next_start = chars.peek().map(|(i, _)| *i).unwrap_or(source.len());
                line_starts.push(next_start);
            }
        }
        LineIndex { line_starts }
    }

    /// 1-based (line, column) of a byte offset
    fn position(&self, source: &str, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
        let start = self.line_starts[line];
        let column = source
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset.saturating_sub(start));
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tangle::lexer::tokenize;
    use crate::tangle::parser::parse_document;

    #[test]
    fn test_line_index_positions() {
        let source = "ab\ncd\r\nef";
        let index = LineIndex::new(source);
        assert_eq!(index.line_starts, vec![0, 3, 7]);
        assert_eq!(index.position(source, 0), (1, 1));
        assert_eq!(index.position(source, 1), (1, 2));
        assert_eq!(index.position(source, 3), (2, 1));
        assert_eq!(index.position(source, 7), (3, 1));
        assert_eq!(index.position(source, 8), (3, 2));
    }

    #[test]
    fn test_column_counts_characters_not_bytes() {
        let source = "héllo \"";
        let index = LineIndex::new(source);
        // 'é' is two bytes wide, so the quote's byte offset exceeds its
        // character position
        let quote = source.find('"').expect("quote present");
        assert_eq!(quote, 7);
        assert_eq!(index.position(source, quote), (1, 7));
    }

    #[test]
    fn test_lex_error_translation() {
        let source = "node \"abc";
        let errors = tokenize(source).unwrap_err();
        let diagnostics = from_lex_errors(&errors, source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].offset, 5);
        assert_eq!(diagnostics[0].length, 1);
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[0].column, 6);
        assert_eq!(diagnostics[0].token_kind, "unterminated-string");
    }

    #[test]
    fn test_parse_error_translation() {
        let source = "a 1\nb {} {}";
        let tokens = tokenize(source).expect("lex failure");
        let error = parse_document(&tokens, source).unwrap_err();
        let diagnostic = from_parse_error(&error, source);
        assert_eq!(diagnostic.line, 2);
        assert_eq!(diagnostic.token_kind, "'{'");
        assert!(diagnostic.message.contains("expected"));
    }

    #[test]
    fn test_parse_error_at_end_of_input() {
        let source = "a {";
        let tokens = tokenize(source).expect("lex failure");
        let error = parse_document(&tokens, source).unwrap_err();
        let diagnostic = from_parse_error(&error, source);
        assert_eq!(diagnostic.token_kind, "end-of-input");
        assert_eq!(diagnostic.offset, source.len());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            message: "expected a value".to_string(),
            offset: 4,
            length: 1,
            line: 2,
            column: 3,
            token_kind: "'='".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "2:3: expected a value");
    }
}
