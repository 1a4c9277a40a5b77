//! Error types for script-level extraction.

use med_rules::RuleError;
use thiserror::Error;

/// Errors that can occur while extracting rules from a SQL script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A fragment of one insert statement failed to extract.
    #[error("{destination}: {source}")]
    Rule {
        /// Destination table of the failing insert.
        destination: String,
        /// The underlying fragment error.
        source: RuleError,
    },

    /// An insert statement without a destination table name.
    #[error("insert statement without destination: '{0}'")]
    MissingDestination(String),

    /// A destination name that does not follow `<Drug>By<Tag>_<suffix>`.
    #[error("invalid destination table name: {0}")]
    InvalidDestination(String),

    /// A destination tag that names no known match method.
    #[error("unknown match tag '{tag}' in destination {destination}")]
    UnknownMatchTag {
        /// Destination table name.
        destination: String,
        /// The tag after `By`.
        tag: String,
    },

    /// A name insert whose `where (...)` condition could not be located.
    #[error("no name condition found in {destination}")]
    MissingCondition {
        /// Destination table name.
        destination: String,
    },

    /// A lab code list line without the expected surroundings.
    #[error("malformed lab code list at line {line}")]
    MalformedLabList {
        /// 1-based line number of the code list.
        line: usize,
    },
}

impl ScriptError {
    pub(crate) fn rule(destination: &str, source: RuleError) -> Self {
        ScriptError::Rule {
            destination: destination.to_string(),
            source,
        }
    }
}

/// Result type for script-level extraction.
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;
