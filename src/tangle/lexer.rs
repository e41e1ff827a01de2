//! Stateful lexer for the tangle format
//!
//! Lexing is driven by a mode stack: the driver starts in the `main` mode
//! and pushes a frame whenever a string, multiline string, or `/* ... */`
//! comment opens, morphing the logos lexer to that mode's token enum. A
//! nested `/*` inside a comment pushes another frame, so the comment mode
//! only pops back to `main` at depth zero.
//!
//! [`tokenize`] is a complete pre-pass over the input: every character is
//! classified before parsing starts, and all lex errors found anywhere in
//! the input are collected and reported together. If any error occurred,
//! no tokens reach the grammar engine.

pub mod strings;
pub mod tokens;

use std::fmt;
use std::ops::Range;

use logos::Logos;

use tokens::{CommentToken, MainToken, MultilineToken, StringToken};

pub use tokens::{Token, TokenKind};

/// Lexing failure categories.
///
/// Doubles as the logos error type for every mode's token enum; the
/// default variant is what an unmatched character run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    UnexpectedCharacters,
    UnterminatedString,
    UnterminatedRawString,
    UnterminatedMultilineString,
    UnterminatedComment,
    InvalidEscape,
    InvalidUnicodeEscape,
    MalformedMultilineOpen,
    MalformedMultilineIndent,
    IntegerOutOfRange,
}

impl LexErrorKind {
    /// Short label, used as the diagnostic token kind
    pub fn label(&self) -> &'static str {
        match self {
            LexErrorKind::UnexpectedCharacters => "unexpected-characters",
            LexErrorKind::UnterminatedString => "unterminated-string",
            LexErrorKind::UnterminatedRawString => "unterminated-raw-string",
            LexErrorKind::UnterminatedMultilineString => "unterminated-multiline-string",
            LexErrorKind::UnterminatedComment => "unterminated-comment",
            LexErrorKind::InvalidEscape => "invalid-escape",
            LexErrorKind::InvalidUnicodeEscape => "invalid-unicode-escape",
            LexErrorKind::MalformedMultilineOpen => "malformed-multiline-string",
            LexErrorKind::MalformedMultilineIndent => "malformed-multiline-indentation",
            LexErrorKind::IntegerOutOfRange => "integer-out-of-range",
        }
    }

    /// Human-readable expectation message
    pub fn message(&self) -> &'static str {
        match self {
            LexErrorKind::UnexpectedCharacters => {
                "unexpected characters; no token can start here"
            }
            LexErrorKind::UnterminatedString => {
                "unterminated string; expected a closing '\"' before the end of the line"
            }
            LexErrorKind::UnterminatedRawString => {
                "unterminated raw string; expected a closing quote with matching '#' count"
            }
            LexErrorKind::UnterminatedMultilineString => {
                "unterminated multiline string; expected a closing '\"\"\"'"
            }
            LexErrorKind::UnterminatedComment => "unterminated comment; expected '*/'",
            LexErrorKind::InvalidEscape => "invalid escape sequence",
            LexErrorKind::InvalidUnicodeEscape => {
                "invalid unicode escape; expected 1-6 hex digits naming a unicode scalar value"
            }
            LexErrorKind::MalformedMultilineOpen => {
                "malformed multiline string; expected a newline after the opening '\"\"\"'"
            }
            LexErrorKind::MalformedMultilineIndent => {
                "malformed multiline string; every line must start with the closing line's indentation"
            }
            LexErrorKind::IntegerOutOfRange => "integer literal out of range",
        }
    }
}

/// An error found during the lexing pre-pass
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Range<usize>,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.kind.message(), self.span.start, self.span.end)
    }
}

impl std::error::Error for LexError {}

/// A scanning context on the mode stack; `main` is the implicit bottom.
/// Opener offsets live in the mode helpers, which carry them into any
/// unterminated-construct error, so the stack only tracks the context kind.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    BlockComment,
    String,
    MultilineString,
}

/// Tokenize tangle source text.
///
/// Returns the full token stream, or every lex error found in the input.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    let mut tokens = Vec::new();
    let mut errors: Vec<LexError> = Vec::new();
    let mut modes: Vec<Mode> = Vec::new();
    let mut lexer = MainToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let kind = match result {
            Ok(MainToken::StringOpen) => {
                let (returned, outcome) = string_mode(lexer, span.start, &mut modes, &mut errors);
                lexer = returned;
                match outcome {
                    Ok(token) => tokens.push(token),
                    Err(error) => errors.push(error),
                }
                continue;
            }
            Ok(MainToken::MultilineOpen) => {
                let (returned, outcome) =
                    multiline_mode(lexer, span.start, &mut modes, &mut errors);
                lexer = returned;
                match outcome {
                    Ok(token) => tokens.push(token),
                    Err(error) => errors.push(error),
                }
                continue;
            }
            Ok(MainToken::CommentOpen) => {
                let (returned, outcome) = comment_mode(lexer, span.start, &mut modes);
                lexer = returned;
                match outcome {
                    Ok(token) => tokens.push(token),
                    Err(error) => errors.push(error),
                }
                continue;
            }
            Ok(MainToken::Bom) => TokenKind::Bom,
            Ok(MainToken::Newline) => TokenKind::Newline,
            Ok(MainToken::Whitespace) => TokenKind::Whitespace,
            Ok(MainToken::LineComment) => TokenKind::LineComment,
            Ok(MainToken::SlashDash) => TokenKind::SlashDash,
            Ok(MainToken::RawString(text)) => TokenKind::RawString(text),
            Ok(MainToken::Identifier) => TokenKind::Identifier(lexer.slice().to_string()),
            Ok(MainToken::True) => TokenKind::Bool(true),
            Ok(MainToken::False) => TokenKind::Bool(false),
            Ok(MainToken::Null) => TokenKind::Null,
            Ok(MainToken::Inf) => TokenKind::Float(f64::INFINITY),
            Ok(MainToken::NegInf) => TokenKind::Float(f64::NEG_INFINITY),
            Ok(MainToken::Nan) => TokenKind::Float(f64::NAN),
            Ok(MainToken::Integer(value)) => TokenKind::Integer(value),
            Ok(MainToken::Float(value)) => TokenKind::Float(value),
            Ok(MainToken::LeftParen) => TokenKind::LeftParen,
            Ok(MainToken::RightParen) => TokenKind::RightParen,
            Ok(MainToken::LeftBrace) => TokenKind::LeftBrace,
            Ok(MainToken::RightBrace) => TokenKind::RightBrace,
            Ok(MainToken::Semicolon) => TokenKind::Semicolon,
            Ok(MainToken::Equals) => TokenKind::Equals,
            Err(kind) => {
                push_error(&mut errors, kind, span);
                continue;
            }
        };
        tokens.push(Token { kind, span });
    }

    debug_assert!(modes.is_empty(), "every mode helper pops its own frames");
    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Record an error, merging adjacent unrecognized characters into one run
fn push_error(errors: &mut Vec<LexError>, kind: LexErrorKind, span: Range<usize>) {
    if kind == LexErrorKind::UnexpectedCharacters {
        if let Some(last) = errors.last_mut() {
            if last.kind == LexErrorKind::UnexpectedCharacters && last.span.end == span.start {
                last.span.end = span.end;
                return;
            }
        }
    }
    errors.push(LexError { kind, span });
}

/// Scan a `"..."` body. The opening quote is at `open`; on success the
/// token covers quotes and body with the text fully unescaped.
fn string_mode<'s>(
    lexer: logos::Lexer<'s, MainToken>,
    open: usize,
    modes: &mut Vec<Mode>,
    errors: &mut Vec<LexError>,
) -> (logos::Lexer<'s, MainToken>, Result<Token, LexError>) {
    modes.push(Mode::String);
    let mut lex = lexer.morph::<StringToken>();
    let mut text = String::new();

    let result = loop {
        match lex.next() {
            // A raw newline or the end of input leaves the mode open: the
            // error points at the opening quote.
            None | Some(Ok(StringToken::Newline)) => {
                pop_mode(modes, Mode::String);
                break Err(LexError {
                    kind: LexErrorKind::UnterminatedString,
                    span: open..open + 1,
                });
            }
            Some(Ok(StringToken::Quote)) => {
                pop_mode(modes, Mode::String);
                break Ok(Token {
                    kind: TokenKind::String(text),
                    span: open..lex.span().end,
                });
            }
            Some(Ok(StringToken::Chars)) => text.push_str(lex.slice()),
            Some(Ok(StringToken::Escape(c)) | Ok(StringToken::Unicode(c))) => text.push(c),
            Some(Ok(StringToken::WhitespaceEscape)) => {}
            // BadEscape's callback always errors, so it only surfaces here
            Some(Ok(StringToken::BadEscape)) => {}
            Some(Err(kind)) => push_error(errors, kind, lex.span()),
        }
    };
    (lex.morph(), result)
}

/// Scan a `"""..."""` body and strip the closing delimiter's indentation.
fn multiline_mode<'s>(
    lexer: logos::Lexer<'s, MainToken>,
    open: usize,
    modes: &mut Vec<Mode>,
    errors: &mut Vec<LexError>,
) -> (logos::Lexer<'s, MainToken>, Result<Token, LexError>) {
    modes.push(Mode::MultilineString);
    let mut lex = lexer.morph::<MultilineToken>();
    let mut raw = String::new();

    let result = loop {
        match lex.next() {
            None => {
                pop_mode(modes, Mode::MultilineString);
                break Err(LexError {
                    kind: LexErrorKind::UnterminatedMultilineString,
                    span: open..open + 3,
                });
            }
            Some(Ok(MultilineToken::Close)) => {
                pop_mode(modes, Mode::MultilineString);
                let end = lex.span().end;
                break strings::dedent_multiline(&raw, open, end).map(|text| Token {
                    kind: TokenKind::MultilineString(text),
                    span: open..end,
                });
            }
            // Newlines are normalized so dedenting can split on '\n'
            Some(Ok(MultilineToken::Newline)) => raw.push('\n'),
            Some(Ok(MultilineToken::Quotes) | Ok(MultilineToken::Text)) => {
                raw.push_str(lex.slice())
            }
            Some(Err(kind)) => push_error(errors, kind, lex.span()),
        }
    };
    (lex.morph(), result)
}

/// Scan a `/* ... */` body, pushing a frame per nested `/*` so the mode
/// pops only at depth zero. The whole comment becomes a single token.
fn comment_mode<'s>(
    lexer: logos::Lexer<'s, MainToken>,
    open: usize,
    modes: &mut Vec<Mode>,
) -> (logos::Lexer<'s, MainToken>, Result<Token, LexError>) {
    let base = modes.len();
    modes.push(Mode::BlockComment);
    let mut lex = lexer.morph::<CommentToken>();

    let result = loop {
        match lex.next() {
            None => {
                modes.truncate(base);
                break Err(LexError {
                    kind: LexErrorKind::UnterminatedComment,
                    span: open..open + 2,
                });
            }
            Some(Ok(CommentToken::Open)) => modes.push(Mode::BlockComment),
            Some(Ok(CommentToken::Close)) => {
                pop_mode(modes, Mode::BlockComment);
                if modes.len() == base {
                    break Ok(Token {
                        kind: TokenKind::MultilineComment,
                        span: open..lex.span().end,
                    });
                }
            }
            Some(Ok(_)) => {}
            Some(Err(_)) => {}
        }
    };
    (lex.morph(), result)
}

fn pop_mode(modes: &mut Vec<Mode>, expected: Mode) {
    let popped = modes.pop();
    debug_assert_eq!(
        popped,
        Some(expected),
        "mode stack out of sync while popping"
    );
}
