//! Validation of pattern-match calls.

use crate::ast::{Arg, ExprNode};
use crate::config::Conventions;
use crate::error::{RuleError, RuleResult};

/// The useful parts of a validated pattern-match call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCall {
    /// Pattern text without quotes.
    pub pattern: String,
    /// Leading comment without delimiters, if any.
    pub note: Option<String>,
}

/// Checks calls against the `function(subject, 'pattern', 'flag')` convention.
///
/// ```rust
/// use med_rules::{parse_fragment, CallValidator, Conventions};
///
/// let conventions = Conventions::default();
/// let node = parse_fragment("regexp_like(a.RAW_RX_MED_NAME, 'Glucophage', 'i')").unwrap();
/// let call = CallValidator::new(&conventions).validate(&node).unwrap();
/// assert_eq!(call.pattern, "Glucophage");
/// assert_eq!(call.note, None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CallValidator<'c> {
    conventions: &'c Conventions,
}

impl<'c> CallValidator<'c> {
    /// Creates a validator for the given conventions.
    pub fn new(conventions: &'c Conventions) -> Self {
        Self { conventions }
    }

    /// Validates a node that must be a pattern-match call.
    ///
    /// Any deviation is a structural error carrying the node.
    pub fn validate(&self, node: &ExprNode) -> RuleResult<MatchCall> {
        let ExprNode::Call(call) = node else {
            return Err(RuleError::structural(
                format!("expected a {} call, found {}", self.conventions.function, node.label()),
                node,
            ));
        };

        if call.function != self.conventions.function {
            return Err(RuleError::structural(
                format!(
                    "expected function {}, found {}",
                    self.conventions.function, call.function
                ),
                node,
            ));
        }

        let [subject, pattern, flag] = call.args.as_slice() else {
            return Err(RuleError::structural(
                format!("expected 3 arguments, found {}", call.args.len()),
                node,
            ));
        };

        if subject.as_identifier() != Some(self.conventions.subject.as_str()) {
            return Err(RuleError::structural(
                format!("first argument must be {}", self.conventions.subject),
                node,
            ));
        }

        let Arg::Literal(pattern) = pattern else {
            return Err(RuleError::structural(
                "second argument must be a pattern literal",
                node,
            ));
        };

        if flag.as_literal() != Some(self.conventions.flag.as_str()) {
            return Err(RuleError::structural(
                format!("third argument must be '{}'", self.conventions.flag),
                node,
            ));
        }

        Ok(MatchCall {
            pattern: pattern.clone(),
            note: call.comment.as_deref().and_then(clean_note),
        })
    }
}

/// Strips comment delimiters, surrounding whitespace and a trailing colon.
fn clean_note(comment: &str) -> Option<String> {
    let inner = comment.strip_prefix("/*").unwrap_or(comment);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    let note = inner.trim().trim_end_matches(':').trim();
    (!note.is_empty()).then(|| note.to_string())
}
