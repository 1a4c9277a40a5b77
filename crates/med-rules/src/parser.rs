//! Recursive-descent parser for pattern-match conditions.
//!
//! Grammar, with `or` binding looser than `and`:
//!
//! ```text
//! expr    = and-term ( "or" and-term )*
//! and-term= primary ( "and" primary )*
//! primary = "(" expr ")" | "not" expr | call
//! call    = [COMMENT] IDENTIFIER "(" arg ( "," arg )* ")"
//! arg     = LITERAL | IDENTIFIER
//! ```
//!
//! The operand of `not` is a whole `expr`, so `not a or b` negates `a or b`.

use log::trace;

use crate::ast::{Arg, Call, Connective, ExprNode};
use crate::error::{RuleError, RuleResult};
use crate::token::{Token, TokenKind, Tokenizer, TokenizerOptions};

/// Precedence levels, loosest first.
const LEVELS: [Connective; 2] = [Connective::Or, Connective::And];

/// Maximum number of enclosing `(` and `not` around any term.
pub const MAX_DEPTH: usize = 128;

/// Parses a fragment, ignoring anything after the first complete expression.
///
/// Prefer [`parse_fragment`], which rejects trailing tokens.
pub fn parse_expression(source: &str) -> RuleResult<ExprNode> {
    Parser::new(source)?.parse_expression()
}

/// Parses a whole fragment.
///
/// # Examples
///
/// ```rust
/// use med_rules::{parse_fragment, ExprNode};
///
/// let expr = parse_fragment(
///     "regexp_like(a.RAW_RX_MED_NAME, 'Acetohexamide','i') or \
///      regexp_like(a.RAW_RX_MED_NAME, 'D[i|y]melor','i')",
/// )
/// .unwrap();
/// assert!(matches!(expr, ExprNode::Or(ref disjuncts) if disjuncts.len() == 2));
///
/// // Unbalanced parentheses are rejected.
/// assert!(parse_fragment("(regexp_like(a.RAW_RX_MED_NAME, 'x', 'i')").is_err());
/// ```
pub fn parse_fragment(source: &str) -> RuleResult<ExprNode> {
    parse_fragment_with(source, TokenizerOptions::default())
}

/// Parses a whole fragment with the given tokenizer options.
pub fn parse_fragment_with(source: &str, options: TokenizerOptions) -> RuleResult<ExprNode> {
    Parser::with_options(source, options)?.parse_fragment()
}

/// One-token-lookahead parser over a lazy token stream.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Tokenizer<'a>,
    next: Option<Token<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser with default tokenizer options.
    pub fn new(source: &'a str) -> RuleResult<Self> {
        Self::with_options(source, TokenizerOptions::default())
    }

    /// Creates a parser, reading the first token.
    pub fn with_options(source: &'a str, options: TokenizerOptions) -> RuleResult<Self> {
        let mut tokens = Tokenizer::with_options(source, options);
        let next = tokens.next().transpose()?;
        Ok(Self {
            tokens,
            next,
            depth: 0,
        })
    }

    /// Parses one expression and stops, leaving any later tokens unread.
    pub fn parse_expression(&mut self) -> RuleResult<ExprNode> {
        self.conditional(&LEVELS)
    }

    /// Parses one expression and requires the input to end there.
    pub fn parse_fragment(mut self) -> RuleResult<ExprNode> {
        let expr = self.parse_expression()?;
        if self.next.is_some() {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    /// The next unread token.
    pub fn peek(&self) -> Option<&Token<'a>> {
        self.next.as_ref()
    }

    fn advance(&mut self) -> RuleResult<Option<Token<'a>>> {
        let current = self.next.take();
        self.next = self.tokens.next().transpose()?;
        if let Some(token) = &current {
            trace!("consumed {}", token);
        }
        Ok(current)
    }

    fn accept(&mut self, kind: TokenKind) -> RuleResult<Option<Token<'a>>> {
        if self.next.is_some_and(|t| t.kind == kind) {
            self.advance()
        } else {
            Ok(None)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> RuleResult<Token<'a>> {
        match self.accept(kind)? {
            Some(token) => Ok(token),
            None => Err(self.unexpected(kind.to_string())),
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> RuleError {
        RuleError::Syntax {
            expected: expected.into(),
            found: self
                .next
                .map_or_else(|| "end of input".to_string(), |t| t.to_string()),
        }
    }

    // ========================================================================
    // Grammar
    // ========================================================================

    fn conditional(&mut self, levels: &[Connective]) -> RuleResult<ExprNode> {
        let Some((&connective, rest)) = levels.split_first() else {
            return self.primary();
        };

        let keyword = match connective {
            Connective::Or => TokenKind::Or,
            Connective::And => TokenKind::And,
        };
        let mut parts = vec![self.conditional(rest)?];
        while self.accept(keyword)?.is_some() {
            parts.push(self.conditional(rest)?);
        }
        Ok(connective.collapse(parts))
    }

    fn primary(&mut self) -> RuleResult<ExprNode> {
        if self.accept(TokenKind::LParen)?.is_some() {
            let inner = self.nested()?;
            self.expect(TokenKind::RParen)?;
            return Ok(inner);
        }

        if self.accept(TokenKind::Not)?.is_some() {
            let inner = self.nested()?;
            return Ok(ExprNode::negate(inner));
        }

        self.call().map(ExprNode::Call)
    }

    fn nested(&mut self) -> RuleResult<ExprNode> {
        if self.depth == MAX_DEPTH {
            return Err(self.unexpected(format!("at most {MAX_DEPTH} nested terms")));
        }
        self.depth += 1;
        let inner = self.conditional(&LEVELS);
        self.depth -= 1;
        inner
    }

    fn call(&mut self) -> RuleResult<Call> {
        let comment = self.accept(TokenKind::Comment)?.map(|t| t.text.to_string());
        let function = self.expect(TokenKind::Identifier)?.text.to_string();
        self.expect(TokenKind::LParen)?;

        let mut args = vec![self.arg()?];
        while self.accept(TokenKind::Comma)?.is_some() {
            args.push(self.arg()?);
        }
        self.expect(TokenKind::RParen)?;

        Ok(Call {
            function,
            args,
            comment,
        })
    }

    fn arg(&mut self) -> RuleResult<Arg> {
        if let Some(token) = self.accept(TokenKind::Literal)? {
            return Ok(Arg::Literal(unquote(token.text).to_string()));
        }
        if let Some(token) = self.accept(TokenKind::Identifier)? {
            return Ok(Arg::Identifier(token.text.to_string()));
        }
        Err(self.unexpected("LITERAL or IDENTIFIER"))
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text)
}
