//! Token definitions for the tangle format
//!
//! Each lexer mode gets its own logos derive enum: [`MainToken`] for
//! top-level scanning, [`StringToken`] for quoted string bodies,
//! [`MultilineToken`] for triple-quoted string bodies, and [`CommentToken`]
//! for `/* ... */` bodies. Within a mode, logos resolves overlaps by
//! longest match first and then by explicit priority, which is how the
//! keyword literals (`true`, `null`, `inf`, ...) win over the bare
//! identifier pattern.
//!
//! The driver in [`super`] morphs one logos lexer between these enums as
//! modes are pushed and popped, and flattens the result into [`Token`]s.

use std::ops::Range;

use logos::Logos;

use super::strings::{escape_char, invalid_escape, lex_raw_string, unicode_escape};
use super::LexErrorKind;

/// Top-level token patterns (the `main` mode).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
pub enum MainToken {
    #[token("\u{FEFF}")]
    Bom,

    #[regex(r"\r\n|[\n\r\u{0085}\u{000C}\u{2028}\u{2029}]")]
    Newline,

    // Inline whitespace run (newlines are a separate token)
    #[regex(r"[ \t\u{00A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}]+")]
    Whitespace,

    // Runs to end of line; the newline itself is not consumed
    #[regex(r"//[^\n\r\u{0085}\u{000C}\u{2028}\u{2029}]*")]
    LineComment,

    /// Opens a `/* ... */` comment; the driver pushes the comment mode
    #[token("/*")]
    CommentOpen,

    /// The comment-disables-the-next-construct token
    #[token("/-")]
    SlashDash,

    /// Raw string `r"..."`, `r#"..."#`, ... with matched `#` depth.
    /// The callback consumes the body and the closing delimiter.
    #[regex(r##"r#*""##, lex_raw_string)]
    RawString(String),

    /// Opens a `"""..."""` string; the driver pushes the multiline mode
    #[token("\"\"\"")]
    MultilineOpen,

    /// Opens a `"..."` string; the driver pushes the string mode
    #[token("\"")]
    StringOpen,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equals,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("inf")]
    Inf,
    #[token("-inf")]
    NegInf,
    #[token("nan")]
    Nan,

    #[regex(r"[+-]?0x[0-9a-fA-F][0-9a-fA-F_]*", lex_radix_int, priority = 6)]
    #[regex(r"[+-]?0o[0-7][0-7_]*", lex_radix_int, priority = 6)]
    #[regex(r"[+-]?0b[01][01_]*", lex_radix_int, priority = 6)]
    #[regex(r"[+-]?[0-9][0-9_]*", lex_dec_int, priority = 6)]
    Integer(i64),

    #[regex(
        r"[+-]?[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?",
        lex_float,
        priority = 6
    )]
    #[regex(r"[+-]?[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*", lex_float, priority = 6)]
    Float(f64),

    // Bare identifier: no whitespace, no digits in first position, and none
    // of the characters that open another token. Lowest priority so every
    // more specific lexeme above wins a tie.
    #[regex(
        r#"[^\\/(){};\[\]=,"0-9 \t\n\r\u{FEFF}\u{0085}\u{000C}\u{2028}\u{2029}\u{00A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}][^\\/(){};\[\]=," \t\n\r\u{FEFF}\u{0085}\u{000C}\u{2028}\u{2029}\u{00A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}]*"#,
        priority = 1
    )]
    Identifier,
}

/// Patterns inside a `"..."` string (the `string` mode).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
pub enum StringToken {
    /// Closing quote; pops the mode
    #[token("\"")]
    Quote,

    /// Single-character escape, resolved to the character it denotes
    #[regex(r#"\\[nrt\\/"bfs]"#, escape_char)]
    Escape(char),

    /// `\u{...}` escape, validated to a unicode scalar value
    #[regex(r"\\u\{[0-9a-fA-F]{1,6}\}", unicode_escape)]
    Unicode(char),

    /// Escaped whitespace run (line continuation); contributes nothing
    #[regex(r"\\(\r\n|[ \t\n\r\u{0085}\u{000C}\u{2028}\u{2029}\u{00A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}])+")]
    WhitespaceEscape,

    /// A backslash not forming any escape above
    #[token("\\", invalid_escape)]
    BadEscape,

    /// Unescaped newline: the string was never terminated on its line
    #[regex(r"\r\n|[\n\r\u{0085}\u{000C}\u{2028}\u{2029}]")]
    Newline,

    /// Literal character run
    #[regex(r#"[^"\\\n\r\u{0085}\u{000C}\u{2028}\u{2029}]+"#)]
    Chars,
}

/// Patterns inside a `"""..."""` string (the `multilineString` mode).
///
/// No escape processing happens here; bodies are literal apart from the
/// indentation prefix stripped when the mode pops.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
pub enum MultilineToken {
    /// Closing delimiter; pops the mode
    #[token("\"\"\"")]
    Close,

    #[regex(r"\r\n|[\n\r\u{0085}\u{000C}\u{2028}\u{2029}]")]
    Newline,

    /// One or two quotes that do not form the closing delimiter
    #[regex(r#""{1,2}"#)]
    Quotes,

    #[regex(r#"[^"\n\r\u{0085}\u{000C}\u{2028}\u{2029}]+"#)]
    Text,
}

/// Patterns inside a `/* ... */` comment (the `blockComment` mode).
///
/// Openers and closers surface so the driver can track nesting depth on
/// its mode stack; everything else is discarded.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
pub enum CommentToken {
    #[token("/*")]
    Open,
    #[token("*/")]
    Close,
    #[regex(r"[^*/]+")]
    Text,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
}

fn lex_dec_int(lex: &mut logos::Lexer<MainToken>) -> Result<i64, LexErrorKind> {
    let cleaned: String = lex.slice().chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<i64>()
        .map_err(|_| LexErrorKind::IntegerOutOfRange)
}

fn lex_radix_int(lex: &mut logos::Lexer<MainToken>) -> Result<i64, LexErrorKind> {
    let slice = lex.slice();
    let (sign, rest) = match slice.as_bytes()[0] {
        b'+' => ("", &slice[1..]),
        b'-' => ("-", &slice[1..]),
        _ => ("", slice),
    };
    let radix = match &rest[..2] {
        "0x" => 16,
        "0o" => 8,
        _ => 2,
    };
    let digits: String = rest[2..].chars().filter(|c| *c != '_').collect();
    i64::from_str_radix(&format!("{}{}", sign, digits), radix)
        .map_err(|_| LexErrorKind::IntegerOutOfRange)
}

fn lex_float(lex: &mut logos::Lexer<MainToken>) -> Option<f64> {
    lex.slice().replace('_', "").parse().ok()
}

/// A classified span of source text, as produced by [`super::tokenize`].
///
/// String-like kinds carry their resolved text (escapes applied, raw and
/// multiline delimiters stripped); numeric kinds carry the parsed value.
/// The literal spelling of any token is always recoverable from `span`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// The flattened token vocabulary consumed by the grammar engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Bom,
    Newline,
    Whitespace,
    LineComment,
    MultilineComment,
    SlashDash,
    String(String),
    RawString(String),
    MultilineString(String),
    Identifier(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,
    Equals,
}

impl TokenKind {
    /// Short label for diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Bom => "byte-order mark",
            TokenKind::Newline => "newline",
            TokenKind::Whitespace => "whitespace",
            TokenKind::LineComment => "line comment",
            TokenKind::MultilineComment => "multiline comment",
            TokenKind::SlashDash => "'/-'",
            TokenKind::String(_) => "string",
            TokenKind::RawString(_) => "raw string",
            TokenKind::MultilineString(_) => "multiline string",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Integer(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::Bool(_) => "boolean",
            TokenKind::Null => "null",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Equals => "'='",
        }
    }

    /// Check if this token is inline space within a node's entry list
    pub fn is_inline_space(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::MultilineComment)
    }

    /// Check if this token is pure inter-node space
    pub fn is_linespace(&self) -> bool {
        self.is_inline_space() || matches!(self, TokenKind::Newline | TokenKind::LineComment)
    }

    /// Check if this token ends a node's entry list
    pub fn is_entry_terminator(&self) -> bool {
        matches!(
            self,
            TokenKind::RightBrace
                | TokenKind::LineComment
                | TokenKind::Newline
                | TokenKind::Semicolon
        )
    }

    /// Check if this token can start a node (tag opener or name)
    pub fn starts_node(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftParen
                | TokenKind::Identifier(_)
                | TokenKind::String(_)
                | TokenKind::RawString(_)
        )
    }
}
