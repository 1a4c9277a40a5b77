//! Expression tree for pattern-match conditions.

use std::fmt;

/// Boolean connective joining the children of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connective {
    /// Disjunction: `or`
    Or,
    /// Conjunction: `and`
    And,
}

impl Connective {
    /// Keyword text as it appears in source.
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::Or => "or",
            Connective::And => "and",
        }
    }

    /// Joins parsed terms under this connective.
    ///
    /// A single term is returned unchanged rather than wrapped, so composite
    /// nodes always have at least two children.
    pub(crate) fn collapse(self, mut parts: Vec<ExprNode>) -> ExprNode {
        if parts.len() == 1 {
            if let Some(only) = parts.pop() {
                return only;
            }
        }
        match self {
            Connective::Or => ExprNode::Or(parts),
            Connective::And => ExprNode::And(parts),
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arg {
    /// A single-quoted string literal, stored without its quotes.
    Literal(String),
    /// A bare or qualified identifier such as `a.RAW_RX_MED_NAME`.
    Identifier(String),
}

impl Arg {
    /// Creates a literal argument from its unquoted text.
    pub fn literal(text: impl Into<String>) -> Self {
        Arg::Literal(text.into())
    }

    /// Creates an identifier argument.
    pub fn identifier(name: impl Into<String>) -> Self {
        Arg::Identifier(name.into())
    }

    /// Returns the literal text, if this is a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Arg::Literal(text) => Some(text),
            Arg::Identifier(_) => None,
        }
    }

    /// Returns the identifier name, if this is an identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Arg::Identifier(name) => Some(name),
            Arg::Literal(_) => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Literal(text) => write!(f, "'{}'", text),
            Arg::Identifier(name) => f.write_str(name),
        }
    }
}

/// A function call term, optionally preceded by a block comment.
///
/// Example: `/* combination product */ regexp_like(a.RAW_RX_MED_NAME, 'Avandaryl', 'i')`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    /// Name of the called function.
    pub function: String,
    /// Arguments in source order.
    pub args: Vec<Arg>,
    /// The raw block comment (delimiters included) directly before the call.
    pub comment: Option<String>,
}

impl Call {
    /// Creates a call without a leading comment.
    pub fn new(function: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            function: function.into(),
            args,
            comment: None,
        }
    }

    /// Attaches a raw leading comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(comment) = &self.comment {
            write!(f, "{} ", comment)?;
        }
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// A node of the parsed condition.
///
/// `Or` and `And` always hold at least two children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprNode {
    /// Disjunction of two or more terms.
    Or(Vec<ExprNode>),
    /// Conjunction of two or more terms.
    And(Vec<ExprNode>),
    /// Negation of a term.
    Not(Box<ExprNode>),
    /// A function call.
    Call(Call),
}

impl ExprNode {
    /// Wraps a node in a negation.
    pub fn negate(inner: ExprNode) -> Self {
        ExprNode::Not(Box::new(inner))
    }

    /// Short label for the node's shape, used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ExprNode::Or(_) => "OR",
            ExprNode::And(_) => "AND",
            ExprNode::Not(_) => "NOT",
            ExprNode::Call(_) => "call",
        }
    }

    /// Returns the call, if this node is one.
    pub fn as_call(&self) -> Option<&Call> {
        match self {
            ExprNode::Call(call) => Some(call),
            _ => None,
        }
    }

    /// True when text appended after this node's rendering would be absorbed
    /// into a trailing `not` operand.
    fn ends_open(&self) -> bool {
        match self {
            ExprNode::Not(_) => true,
            ExprNode::Call(_) => false,
            ExprNode::Or(children) | ExprNode::And(children) => {
                children.last().is_some_and(|last| last.ends_open())
            }
        }
    }

    fn fmt_composite(
        f: &mut fmt::Formatter<'_>,
        connective: Connective,
        children: &[ExprNode],
    ) -> fmt::Result {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", connective)?;
            }
            let is_last = i + 1 == children.len();
            let grouped = match (connective, child) {
                (_, ExprNode::Or(_)) => true,
                (Connective::And, ExprNode::And(_)) => true,
                (Connective::Or, ExprNode::And(_)) => !is_last && child.ends_open(),
                (_, ExprNode::Not(_)) => !is_last,
                (_, ExprNode::Call(_)) => false,
            };
            if grouped {
                write!(f, "({})", child)?;
            } else {
                write!(f, "{}", child)?;
            }
        }
        Ok(())
    }
}

impl From<Call> for ExprNode {
    fn from(call: Call) -> Self {
        ExprNode::Call(call)
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Or(children) => Self::fmt_composite(f, Connective::Or, children),
            ExprNode::And(children) => Self::fmt_composite(f, Connective::And, children),
            ExprNode::Not(inner) => match inner.as_ref() {
                ExprNode::Call(call) => write!(f, "not {}", call),
                other => write!(f, "not ({})", other),
            },
            ExprNode::Call(call) => write!(f, "{}", call),
        }
    }
}
