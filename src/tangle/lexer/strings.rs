//! String lexing support: escapes, raw strings, multiline dedenting
//!
//! The logos callbacks for string-flavored tokens live here, together with
//! the indentation stripping applied when a `"""` literal closes.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::tokens::{MainToken, StringToken};
use super::{LexError, LexErrorKind};

/// Escape characters recognized inside quoted strings, mapped to the
/// character they denote. `\s` is the explicit-space escape.
static ESCAPES: Lazy<HashMap<char, char>> = Lazy::new(|| {
    HashMap::from([
        ('n', '\n'),
        ('r', '\r'),
        ('t', '\t'),
        ('\\', '\\'),
        ('/', '/'),
        ('"', '"'),
        ('b', '\u{0008}'),
        ('f', '\u{000C}'),
        ('s', ' '),
    ])
});

/// Callback for [`StringToken::Escape`]: resolve `\x` to its character.
pub(crate) fn escape_char(lex: &mut logos::Lexer<StringToken>) -> char {
    let designator = lex.slice().chars().nth(1).unwrap_or('\0');
    ESCAPES.get(&designator).copied().unwrap_or(designator)
}

/// Callback for [`StringToken::BadEscape`]: a backslash starting no
/// recognized escape sequence.
pub(crate) fn invalid_escape(_: &mut logos::Lexer<StringToken>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::InvalidEscape)
}

/// Callback for [`StringToken::Unicode`]: resolve `\u{...}` or reject
/// values outside the unicode scalar range.
pub(crate) fn unicode_escape(lex: &mut logos::Lexer<StringToken>) -> Result<char, LexErrorKind> {
    let slice = lex.slice();
    let hex = &slice[3..slice.len() - 1];
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(LexErrorKind::InvalidUnicodeEscape)
}

/// Callback for [`MainToken::RawString`]: the pattern matched the opener
/// (`r`, zero or more `#`, `"`); consume the body up to a quote followed
/// by the same number of `#` and return the body verbatim.
pub(crate) fn lex_raw_string(lex: &mut logos::Lexer<MainToken>) -> Result<String, LexErrorKind> {
    let hashes = lex.slice().len() - 2;
    let closer = format!("\"{}", "#".repeat(hashes));
    let remainder = lex.remainder();
    match remainder.find(&closer) {
        Some(at) => {
            let body = remainder[..at].to_string();
            lex.bump(at + closer.len());
            Ok(body)
        }
        None => Err(LexErrorKind::UnterminatedRawString),
    }
}

/// Strip the closing delimiter's indentation prefix from a multiline
/// string body.
///
/// `raw` is the body between the `"""` delimiters with newlines normalized
/// to `\n`. It must start with a newline; the final line holds only the
/// whitespace that precedes the closing delimiter and defines the prefix
/// every body line must carry. Lines consisting solely of whitespace
/// collapse to empty lines; any other line missing the prefix rejects the
/// literal.
pub(crate) fn dedent_multiline(raw: &str, open: usize, end: usize) -> Result<String, LexError> {
    let Some(body) = raw.strip_prefix('\n') else {
        return Err(LexError {
            kind: LexErrorKind::MalformedMultilineOpen,
            span: open..open + 3,
        });
    };

    let mut lines: Vec<&str> = body.split('\n').collect();
    let prefix = lines.pop().unwrap_or("");
    if !is_blank(prefix) {
        return Err(LexError {
            kind: LexErrorKind::MalformedMultilineIndent,
            span: open..end,
        });
    }

    let mut stripped = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(rest) = line.strip_prefix(prefix) {
            stripped.push(rest);
        } else if is_blank(line) {
            stripped.push("");
        } else {
            return Err(LexError {
                kind: LexErrorKind::MalformedMultilineIndent,
                span: open..end,
            });
        }
    }
    Ok(stripped.join("\n"))
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_strips_closing_prefix() {
        // """\n    a\n    b\n    """
        let raw = "\n    a\n    b\n    ";
        assert_eq!(dedent_multiline(raw, 0, 0).unwrap(), "a\nb");
    }

    #[test]
    fn test_dedent_empty_body() {
        assert_eq!(dedent_multiline("\n", 0, 0).unwrap(), "");
        assert_eq!(dedent_multiline("\n  ", 0, 0).unwrap(), "");
    }

    #[test]
    fn test_dedent_blank_line_collapses() {
        let raw = "\n  a\n\n  b\n  ";
        assert_eq!(dedent_multiline(raw, 0, 0).unwrap(), "a\n\nb");
    }

    #[test]
    fn test_dedent_rejects_underindented_line() {
        let raw = "\n    a\n  b\n    ";
        let err = dedent_multiline(raw, 0, 20).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedMultilineIndent);
    }

    #[test]
    fn test_dedent_rejects_missing_leading_newline() {
        let err = dedent_multiline("a\n", 5, 10).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedMultilineOpen);
        assert_eq!(err.span, 5..8);
    }

    #[test]
    fn test_dedent_rejects_text_on_closing_line() {
        let err = dedent_multiline("\na\nb", 0, 8).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedMultilineIndent);
    }

    #[test]
    fn test_escape_table_covers_designators() {
        for designator in ['n', 'r', 't', '\\', '/', '"', 'b', 'f', 's'] {
            assert!(ESCAPES.contains_key(&designator));
        }
    }
}
