//! Recursive-descent grammar for tangle documents
//!
//! Grammar outline, leaf to root:
//!
//! ```text
//! tag      := '(' space? (identifier | string) space? ')'
//! entry    := tag space? value
//!           | non-string-literal
//!           | (identifier | string) (space? '=' space? tag? space? value)?
//! node     := tag? space? name entry-loop terminator
//! nodeList := ('/-' linespace? node | linespace | node)*
//! document := BOM? nodeList end-of-input
//! ```
//!
//! The entry loop is gated by two per-node flags: a children block closes
//! entries and itself, so nothing but a terminator may follow it. The loop
//! also stops as soon as an entry is not followed by inline space, which
//! lets a terminator sit flush against the last entry.
//!
//! Parsing fails fast: the first unsatisfied expectation aborts with a
//! [`ParseError`] and no partial tree is produced.

use std::fmt;
use std::ops::Range;

use crate::tangle::lexer::{Token, TokenKind};
use crate::tangle::parser::ast::{Document, Node, Value};

/// A mismatched-token failure: the current token satisfies no alternative
/// the grammar permits at this position. `found` is `None` at end of input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub expected: String,
    pub found: Option<Token>,
    pub span: Range<usize>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(token) => write!(f, "expected {}, found {}", self.expected, token.kind.label()),
            None => write!(f, "expected {}, found end of input", self.expected),
        }
    }
}

impl std::error::Error for ParseError {}

/// One parsed entry: `(key, value, value tag, trailing space consumed)`.
/// `key` is `None` for positional arguments.
type Entry = (Option<String>, Value, Option<String>, bool);

const TERMINATOR: &str = "a node terminator (newline, ';', line comment, or end of input)";

/// Parse a token stream into a document.
///
/// `source` is the text the tokens were lexed from; it is only consulted
/// for literal spellings and error spans, never re-scanned.
pub fn parse_document(tokens: &[Token], source: &str) -> Result<Document, ParseError> {
    Grammar {
        tokens,
        source,
        pos: 0,
    }
    .document()
}

struct Grammar<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
}

impl Grammar<'_> {
    fn document(&mut self) -> Result<Document, ParseError> {
        if self.at(|k| matches!(k, TokenKind::Bom)) {
            self.bump();
        }
        let nodes = self.node_list()?;
        if !self.at_end() {
            return Err(self.expected("end of input"));
        }
        Ok(Document { nodes })
    }

    fn node_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            let Some(kind) = self.peek_kind() else { break };
            if kind == TokenKind::SlashDash {
                // Comment-disables-the-next-node: parse it fully, keep nothing
                self.bump();
                self.skip_linespace();
                self.parse_node()?;
            } else if kind.is_linespace() {
                self.bump();
            } else if kind.starts_node() {
                nodes.push(self.parse_node()?);
            } else {
                break;
            }
        }
        Ok(nodes)
    }

    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let name_tag = if self.at(|k| matches!(k, TokenKind::LeftParen)) {
            let tag = self.parse_tag()?;
            self.skip_inline_space();
            Some(tag)
        } else {
            None
        };

        let name = self.parse_name()?;
        let mut node = Node::new(name);
        node.tags.name = name_tag;

        let mut entries_closed = false;
        let mut children_closed = false;
        let mut had_space = self.skip_inline_space();

        loop {
            // An entry may only start after trailing space from the
            // previous one, and never at a terminating token.
            if !had_space {
                break;
            }
            let Some(kind) = self.peek_kind() else { break };
            if kind.is_entry_terminator() {
                break;
            }

            match kind {
                TokenKind::SlashDash => {
                    self.bump();
                    self.skip_inline_space();
                    if self.at(|k| matches!(k, TokenKind::LeftBrace)) {
                        if children_closed {
                            return Err(self.expected(TERMINATOR));
                        }
                        // Discarded; deliberately leaves both flags open
                        self.parse_children()?;
                        had_space = self.skip_inline_space();
                    } else {
                        if entries_closed {
                            return Err(self.expected(TERMINATOR));
                        }
                        let (_, _, _, trailing) = self.parse_entry()?;
                        had_space = trailing;
                    }
                }
                TokenKind::LeftBrace => {
                    if children_closed {
                        return Err(self.expected(TERMINATOR));
                    }
                    node.children = self.parse_children()?;
                    entries_closed = true;
                    children_closed = true;
                    had_space = self.skip_inline_space();
                }
                _ => {
                    if entries_closed {
                        return Err(self.expected(TERMINATOR));
                    }
                    let (key, value, tag, trailing) = self.parse_entry()?;
                    match key {
                        Some(key) => {
                            // Last occurrence wins for the value and its tag
                            node.tags.properties.insert(key.clone(), tag);
                            node.properties.insert(key, value);
                        }
                        None => {
                            node.values.push(value);
                            node.tags.values.push(tag);
                        }
                    }
                    had_space = trailing;
                }
            }
        }

        match self.peek_kind() {
            None | Some(TokenKind::RightBrace) => {}
            Some(
                TokenKind::LineComment | TokenKind::Newline | TokenKind::Semicolon,
            ) => {
                self.bump();
            }
            Some(_) => return Err(self.expected(TERMINATOR)),
        }

        Ok(node)
    }

    fn parse_name(&mut self) -> Result<String, ParseError> {
        let text = match self.peek_kind() {
            Some(
                TokenKind::Identifier(text)
                | TokenKind::String(text)
                | TokenKind::RawString(text),
            ) => text,
            _ => return Err(self.expected("a node name (identifier or string)")),
        };
        if text.is_empty() {
            return Err(self.expected("a non-empty node name"));
        }
        self.bump();
        Ok(text)
    }

    fn parse_children(&mut self) -> Result<Vec<Node>, ParseError> {
        if !self.at(|k| matches!(k, TokenKind::LeftBrace)) {
            return Err(self.expected("'{'"));
        }
        self.bump();
        let nodes = self.node_list()?;
        if !self.at(|k| matches!(k, TokenKind::RightBrace)) {
            return Err(self.expected("'}'"));
        }
        self.bump();
        Ok(nodes)
    }

    /// Ordered alternatives for one entry; see the type alias [`Entry`].
    fn parse_entry(&mut self) -> Result<Entry, ParseError> {
        // 1. Tagged value: always an argument, never a property key
        if self.at(|k| matches!(k, TokenKind::LeftParen)) {
            let tag = self.parse_tag()?;
            self.skip_inline_space();
            let value = self.parse_value()?;
            let trailing = self.skip_inline_space();
            return Ok((None, value, Some(tag), trailing));
        }

        let Some(kind) = self.peek_kind() else {
            return Err(self.expected("a value or property"));
        };
        match kind {
            // 2. Untagged non-string literal: always an argument
            TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::Bool(_)
            | TokenKind::Null
            | TokenKind::MultilineString(_) => {
                let value = self.parse_value()?;
                let trailing = self.skip_inline_space();
                Ok((None, value, None, trailing))
            }
            // 3. Bare or quoted string: tentatively an argument; a '='
            // after optional space reinterprets it as a property key
            TokenKind::Identifier(text) | TokenKind::String(text) | TokenKind::RawString(text) => {
                self.bump();
                let checkpoint = self.pos;
                let spaced = self.skip_inline_space();
                if self.at(|k| matches!(k, TokenKind::Equals)) {
                    self.bump();
                    self.skip_inline_space();
                    let tag = if self.at(|k| matches!(k, TokenKind::LeftParen)) {
                        let tag = self.parse_tag()?;
                        self.skip_inline_space();
                        Some(tag)
                    } else {
                        None
                    };
                    let value = self.parse_value()?;
                    let trailing = self.skip_inline_space();
                    Ok((Some(text), value, tag, trailing))
                } else {
                    // Roll back the speculation; the space we scanned past
                    // is this argument's trailing space
                    self.pos = checkpoint;
                    let trailing = self.skip_inline_space();
                    debug_assert_eq!(trailing, spaced);
                    Ok((None, Value::String(text), None, trailing))
                }
            }
            _ => Err(self.expected("a value or property")),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let Some(token) = self.tokens.get(self.pos) else {
            return Err(self.expected("a value"));
        };
        let repr = self
            .source
            .get(token.span.clone())
            .unwrap_or_default()
            .to_string();
        let value = match &token.kind {
            TokenKind::String(s)
            | TokenKind::RawString(s)
            | TokenKind::MultilineString(s)
            | TokenKind::Identifier(s) => Value::String(s.clone()),
            TokenKind::Integer(v) => Value::Integer { value: *v, repr },
            TokenKind::Float(v) => Value::Float { value: *v, repr },
            TokenKind::Bool(b) => Value::Bool(*b),
            TokenKind::Null => Value::Null,
            _ => return Err(self.expected("a value")),
        };
        self.bump();
        Ok(value)
    }

    fn parse_tag(&mut self) -> Result<String, ParseError> {
        if !self.at(|k| matches!(k, TokenKind::LeftParen)) {
            return Err(self.expected("'('"));
        }
        self.bump();
        self.skip_inline_space();
        let text = match self.peek_kind() {
            Some(
                TokenKind::Identifier(text)
                | TokenKind::String(text)
                | TokenKind::RawString(text),
            ) => text,
            _ => return Err(self.expected("a tag name (identifier or string)")),
        };
        self.bump();
        self.skip_inline_space();
        if !self.at(|k| matches!(k, TokenKind::RightParen)) {
            return Err(self.expected("')'"));
        }
        self.bump();
        Ok(text)
    }

    /// Consume inline space (whitespace runs, multiline comments); true if
    /// anything was consumed
    fn skip_inline_space(&mut self) -> bool {
        let mut seen = false;
        while self.at(|k| k.is_inline_space()) {
            self.bump();
            seen = true;
        }
        seen
    }

    /// Consume inter-node space: newlines, whitespace, comments
    fn skip_linespace(&mut self) {
        while self.at(|k| k.is_linespace()) {
            self.bump();
        }
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind.clone())
    }

    fn at(&self, predicate: impl FnOnce(&TokenKind) -> bool) -> bool {
        self.tokens.get(self.pos).is_some_and(|t| predicate(&t.kind))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn expected(&self, what: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(token) => ParseError {
                expected: what.to_string(),
                found: Some(token.clone()),
                span: token.span.clone(),
            },
            None => ParseError {
                expected: what.to_string(),
                found: None,
                span: self.source.len()..self.source.len(),
            },
        }
    }
}
