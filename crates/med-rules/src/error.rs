//! Error types for rule extraction.

use thiserror::Error;

use crate::ast::ExprNode;
use crate::record::MatchMethod;

/// Errors that can occur while tokenizing, parsing or flattening a fragment.
///
/// Every variant aborts the fragment it was raised for; no records are
/// produced for a fragment that fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Input that matches no token rule.
    #[error("lexical error at offset {offset}: unexpected input '{snippet}'")]
    Lexical {
        /// Byte offset of the unmatched input.
        offset: usize,
        /// A short excerpt of the input starting at `offset`.
        snippet: String,
    },

    /// A required token was absent, including premature end of input.
    #[error("syntax error: expected {expected}, found {found}")]
    Syntax {
        /// What the parser was looking for.
        expected: String,
        /// What it got instead.
        found: String,
    },

    /// A well-formed tree that does not have the expected rule shape.
    #[error("structural error: {reason}: {node}")]
    Structural {
        /// Which source convention was broken.
        reason: String,
        /// The offending node.
        node: Box<ExprNode>,
    },

    /// The classification handed to an extractor names the other match method.
    #[error("match method mismatch: expected {expected}, found {found}")]
    MatchMethod {
        /// Method the extractor produces.
        expected: MatchMethod,
        /// Method carried by the classification.
        found: MatchMethod,
    },

    /// The code-list marker does not occur in the fragment.
    #[error("code list marker '{marker}' not found")]
    MissingMarker {
        /// The marker that was searched for.
        marker: String,
    },

    /// The code list has no closing parenthesis.
    #[error("unterminated code list after '{marker}'")]
    UnterminatedList {
        /// The marker that introduced the list.
        marker: String,
    },

    /// A code list entry is not an unsigned integer.
    #[error("invalid code value: '{value}'")]
    InvalidCode {
        /// The entry as written.
        value: String,
    },
}

impl RuleError {
    pub(crate) fn structural(reason: impl Into<String>, node: &ExprNode) -> Self {
        RuleError::Structural {
            reason: reason.into(),
            node: Box::new(node.clone()),
        }
    }

    /// Returns true for errors raised by the tokenizer or parser.
    pub fn is_syntactic(&self) -> bool {
        matches!(self, RuleError::Lexical { .. } | RuleError::Syntax { .. })
    }
}

/// Result type for rule extraction.
pub type RuleResult<T> = std::result::Result<T, RuleError>;
