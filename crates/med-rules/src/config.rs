//! Source conventions the extractors check against.

use crate::token::TokenizerOptions;

/// Default pattern-match function.
pub const DEFAULT_FUNCTION: &str = "regexp_like";
/// Default subject column of pattern-match calls.
pub const DEFAULT_SUBJECT: &str = "a.RAW_RX_MED_NAME";
/// Default match-parameter literal (case-insensitive).
pub const DEFAULT_FLAG: &str = "i";
/// Default text introducing a code list.
pub const DEFAULT_CODE_MARKER: &str = "a.RXNORM_CUI in (";

/// Conventions of the generated SQL the extractors rely on.
///
/// # Example
///
/// ```rust
/// use med_rules::Conventions;
///
/// let conventions = Conventions::builder()
///     .with_subject("m.MED_NAME")
///     .with_keyword_boundaries(true)
///     .build();
/// assert_eq!(conventions.function, "regexp_like");
/// assert_eq!(conventions.subject, "m.MED_NAME");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// Name of the pattern-match function.
    pub function: String,
    /// Identifier every pattern-match call tests.
    pub subject: String,
    /// Unquoted match-parameter literal every call must pass.
    pub flag: String,
    /// Text directly preceding the numeric list of a code fragment.
    pub code_marker: String,
    /// Tokenizer switches.
    pub tokenizer: TokenizerOptions,
}

impl Conventions {
    /// Creates a new builder starting from the defaults.
    pub fn builder() -> ConventionsBuilder {
        ConventionsBuilder::default()
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            function: DEFAULT_FUNCTION.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            flag: DEFAULT_FLAG.to_string(),
            code_marker: DEFAULT_CODE_MARKER.to_string(),
            tokenizer: TokenizerOptions::default(),
        }
    }
}

/// Builder for Conventions.
#[derive(Debug, Clone, Default)]
pub struct ConventionsBuilder {
    conventions: Conventions,
}

impl ConventionsBuilder {
    /// Sets the pattern-match function name.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.conventions.function = function.into();
        self
    }

    /// Sets the subject identifier.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.conventions.subject = subject.into();
        self
    }

    /// Sets the match-parameter literal.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.conventions.flag = flag.into();
        self
    }

    /// Sets the code-list marker.
    pub fn with_code_marker(mut self, marker: impl Into<String>) -> Self {
        self.conventions.code_marker = marker.into();
        self
    }

    /// Requires keywords to end at a word boundary.
    pub fn with_keyword_boundaries(mut self, enabled: bool) -> Self {
        self.conventions.tokenizer.keyword_boundaries = enabled;
        self
    }

    /// Builds the Conventions.
    pub fn build(self) -> Conventions {
        self.conventions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventions_default() {
        let c = Conventions::default();
        assert_eq!(c.function, "regexp_like");
        assert_eq!(c.subject, "a.RAW_RX_MED_NAME");
        assert_eq!(c.flag, "i");
        assert_eq!(c.code_marker, "a.RXNORM_CUI in (");
        assert!(!c.tokenizer.keyword_boundaries);
    }

    #[test]
    fn test_conventions_builder() {
        let c = Conventions::builder()
            .with_function("regexp_instr")
            .with_flag("c")
            .with_code_marker("cui in (")
            .with_keyword_boundaries(true)
            .build();

        assert_eq!(c.function, "regexp_instr");
        assert_eq!(c.subject, DEFAULT_SUBJECT);
        assert_eq!(c.flag, "c");
        assert_eq!(c.code_marker, "cui in (");
        assert!(c.tokenizer.keyword_boundaries);
    }

    #[test]
    fn test_builder_without_changes_is_default() {
        assert_eq!(Conventions::builder().build(), Conventions::default());
    }
}
