//! # med-rules
//!
//! Recovers medication-matching rules from the conditions of generated SQL
//! insert statements.
//!
//! Name-based rules live in long boolean expressions of pattern-match calls:
//!
//! ```text
//! regexp_like(a.RAW_RX_MED_NAME,'Glucophage','i') or
//!   (regexp_like(a.RAW_RX_MED_NAME,'Metformin','i') and not (
//!      regexp_like(a.RAW_RX_MED_NAME,'Kazano','i') or
//!      regexp_like(a.RAW_RX_MED_NAME,'Invokamet','i')))
//! ```
//!
//! Code-based rules are plain lists such as `a.RXNORM_CUI in (3842,153843)`.
//! Both are turned into one [`RuleRecord`] per rule.
//!
//! ## Pipeline
//!
//! | Stage | Type |
//! |-------|------|
//! | Tokenize | [`Tokenizer`] |
//! | Parse | [`Parser`], [`parse_fragment`] |
//! | Validate calls | [`CallValidator`] |
//! | Flatten | [`RuleFlattener`] |
//! | Code lists | [`CodeListExtractor`] |
//!
//! ## Usage
//!
//! ```rust
//! use med_rules::{extract_name_rules, RuleClass};
//!
//! let records = extract_name_rules(
//!     "regexp_like(a.RAW_RX_MED_NAME, 'Acetohexamide','i') or \
//!      regexp_like(a.RAW_RX_MED_NAME, 'D[i|y]melor','i')",
//!     &RuleClass::by_name(Some(1), "Sulfonylurea"),
//! )
//! .unwrap();
//!
//! assert_eq!(records[0].pattern.as_deref(), Some("Acetohexamide"));
//! assert_eq!(records[1].pattern.as_deref(), Some("D[i|y]melor"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod codes;
mod config;
mod error;
mod extractor;
mod flatten;
mod parser;
mod record;
mod token;
mod validate;

pub use ast::{Arg, Call, Connective, ExprNode};
pub use codes::CodeListExtractor;
pub use config::{
    Conventions, ConventionsBuilder, DEFAULT_CODE_MARKER, DEFAULT_FLAG, DEFAULT_FUNCTION,
    DEFAULT_SUBJECT,
};
pub use error::{RuleError, RuleResult};
pub use extractor::{extract_code_rules, extract_name_rules, RuleExtractor};
pub use flatten::RuleFlattener;
pub use parser::{parse_expression, parse_fragment, parse_fragment_with, Parser, MAX_DEPTH};
pub use record::{Code, MatchMethod, RuleClass, RuleRecord};
pub use token::{tokenize, Span, Token, TokenKind, Tokenizer, TokenizerOptions};
pub use validate::{CallValidator, MatchCall};
