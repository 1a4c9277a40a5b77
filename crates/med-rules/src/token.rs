//! Tokenizer for the pattern-match condition language.
//!
//! Token rules, tried in priority order at every position:
//!
//! | Kind | Form |
//! |------|------|
//! | `LITERAL` | `'...'` (no escapes) |
//! | `COMMENT` | `/* ... */` |
//! | `LPAREN` `RPAREN` `COMMA` | `(` `)` `,` |
//! | `OR` `AND` `NOT` | exact text `or`, `and`, `not` |
//! | `IDENTIFIER` | `word` or `word.word` |
//!
//! Whitespace runs separate tokens and are never yielded.

use std::fmt;
use std::iter::FusedIterator;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, satisfy},
    combinator::{map, not, opt, recognize, value},
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};

use crate::error::{RuleError, RuleResult};

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Single-quoted string literal.
    Literal,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `or`
    Or,
    /// `and`
    And,
    /// `not`
    Not,
    /// Bare or dot-qualified name.
    Identifier,
    /// Block comment.
    Comment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Literal => "LITERAL",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Or => "OR",
            TokenKind::And => "AND",
            TokenKind::Not => "NOT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Comment => "COMMENT",
        };
        f.write_str(name)
    }
}

/// Byte range of a token in its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

/// A lexed token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The exact source text.
    pub text: &'a str,
    /// Where the text sits in the source.
    pub span: Span,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.text, self.span.start)
    }
}

/// Tokenizer behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenizerOptions {
    /// Require keywords to end at a word boundary.
    ///
    /// Off by default, so `order_id` lexes as `or` followed by `der_id`.
    pub keyword_boundaries: bool,
}

/// Lazy, single-pass token stream over a fragment.
///
/// Yields `Err` once on the first unmatched input and is exhausted afterwards.
///
/// ```rust
/// use med_rules::{TokenKind, Tokenizer};
///
/// let kinds: Vec<TokenKind> = Tokenizer::new("f(a.B, 'x')")
///     .map(|t| t.map(|t| t.kind))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(kinds.len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    offset: usize,
    options: TokenizerOptions,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer with default options.
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, TokenizerOptions::default())
    }

    /// Creates a tokenizer with the given options.
    pub fn with_options(source: &'a str, options: TokenizerOptions) -> Self {
        Self {
            source,
            offset: 0,
            options,
            done: false,
        }
    }

    /// Byte offset of the next unread input.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = RuleResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let rest = &self.source[self.offset..];
            if rest.is_empty() {
                self.done = true;
                break;
            }

            match lexeme(rest, self.options.keyword_boundaries) {
                Ok((remaining, kind)) => {
                    let start = self.offset;
                    self.offset = self.source.len() - remaining.len();
                    let Some(kind) = kind else {
                        continue;
                    };
                    return Some(Ok(Token {
                        kind,
                        text: &self.source[start..self.offset],
                        span: Span {
                            start,
                            end: self.offset,
                        },
                    }));
                }
                Err(_) => {
                    self.done = true;
                    return Some(Err(RuleError::Lexical {
                        offset: self.offset,
                        snippet: rest.chars().take(20).collect(),
                    }));
                }
            }
        }
        None
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenizes a whole fragment, stopping at the first lexical error.
pub fn tokenize(source: &str) -> RuleResult<Vec<Token<'_>>> {
    Tokenizer::new(source).collect()
}

// ============================================================================
// Token rules
// ============================================================================

/// One token or whitespace run (`None`).
fn lexeme<'a>(input: &'a str, bounded: bool) -> IResult<&'a str, Option<TokenKind>> {
    let keyword_rule = |i: &'a str| {
        if bounded {
            bounded_keyword(i)
        } else {
            keyword(i)
        }
    };

    alt((
        value(Some(TokenKind::Literal), literal),
        value(Some(TokenKind::Comment), comment),
        map(punctuation, Some),
        map(keyword_rule, Some),
        value(Some(TokenKind::Identifier), identifier),
        value(None, whitespace),
    ))(input)
}

fn literal(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('\''), take_while(|c| c != '\''), char('\'')))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

fn punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::LParen, char('(')),
        value(TokenKind::RParen, char(')')),
        value(TokenKind::Comma, char(',')),
    ))(input)
}

fn keyword(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::Or, tag("or")),
        value(TokenKind::And, tag("and")),
        value(TokenKind::Not, tag("not")),
    ))(input)
}

fn bounded_keyword(input: &str) -> IResult<&str, TokenKind> {
    terminated(keyword, not(satisfy(is_word_char)))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(word, opt(pair(char('.'), word))))(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_whitespace)(input)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
