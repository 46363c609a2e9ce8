//! S-expression reader for the package manifest
//!
//! A line-tagged tokenizer and a recursive-descent parser producing a
//! cons-list syntax tree. One top-level expression must consume the whole
//! token stream; anything else yields absence, never an error.

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Word(String),
    Quoted(String),
}

/// A token with the source line it started on, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Scan source text into tokens.
///
/// Words are delimited by whitespace (any character at or below space);
/// `(` and `)` are always single-character tokens; `;` discards the rest
/// of the line; `"` reads quoted text to the matching close quote, with
/// end of input closing an unterminated quote.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if (c as u32) <= 0x20 => {}
            '(' => tokens.push(Token {
                kind: TokenKind::Open,
                line,
            }),
            ')' => tokens.push(Token {
                kind: TokenKind::Close,
                line,
            }),
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '"' => {
                let start = line;
                let mut text = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    if c == '\n' {
                        line += 1;
                    }
                    text.push(c);
                }
                tokens.push(Token {
                    kind: TokenKind::Quoted(text),
                    line: start,
                });
            }
            c => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if matches!(next, '(' | ')' | ';' | '"') || (next as u32) <= 0x20 {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Word(word),
                    line,
                });
            }
        }
    }

    tokens
}

/// Parsed manifest syntax: a classic cons-list representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Atom(String),
    Text(String),
    Pair(Box<Expression>, Box<Expression>),
    Nil,
}

impl Expression {
    pub fn atom(value: impl Into<String>) -> Self {
        Expression::Atom(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Expression::Text(value.into())
    }

    /// Build a proper list out of a sequence of expressions.
    pub fn list(items: Vec<Expression>) -> Self {
        items.into_iter().rev().fold(Expression::Nil, |tail, head| {
            Expression::Pair(Box::new(head), Box::new(tail))
        })
    }

    /// Convert a `Pair`/`Nil` chain to a sequence.
    ///
    /// Walks iteratively, so chain length bounds memory rather than stack
    /// depth. A chain ending in anything but `Nil` is not a proper list
    /// and yields `None`; `Nil` itself is the empty list.
    pub fn to_vec(&self) -> Option<Vec<&Expression>> {
        let mut items = Vec::new();
        let mut rest = self;
        loop {
            match rest {
                Expression::Nil => return Some(items),
                Expression::Pair(head, tail) => {
                    items.push(head.as_ref());
                    rest = tail;
                }
                _ => return None,
            }
        }
    }
}

/// Parse one expression from source text.
///
/// The single top-level expression must consume the entire token stream:
/// leftover tokens, an unmatched `(`, or empty input all yield `None`.
pub fn read(source: &str) -> Option<Expression> {
    let tokens = tokenize(source);
    let (expression, rest) = parse_part(&tokens)?;
    if !rest.is_empty() {
        debug!(line = rest[0].line, "trailing tokens after expression");
        return None;
    }
    Some(expression)
}

fn parse_part(tokens: &[Token]) -> Option<(Expression, &[Token])> {
    let (token, rest) = tokens.split_first()?;
    match &token.kind {
        TokenKind::Open => parse_list(rest),
        TokenKind::Close => {
            debug!(line = token.line, "unexpected closing parenthesis");
            None
        }
        TokenKind::Word(value) => Some((Expression::Atom(value.clone()), rest)),
        TokenKind::Quoted(value) => Some((Expression::Text(value.clone()), rest)),
    }
}

fn parse_list(mut tokens: &[Token]) -> Option<(Expression, &[Token])> {
    let mut items = Vec::new();
    loop {
        match tokens.first() {
            // Unmatched `(`: the list never closed before end of input.
            None => return None,
            Some(token) if token.kind == TokenKind::Close => {
                return Some((Expression::list(items), &tokens[1..]));
            }
            Some(_) => {
                let (item, rest) = parse_part(tokens)?;
                items.push(item);
                tokens = rest;
            }
        }
    }
}
