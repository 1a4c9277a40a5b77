//! Fragment entry points.

use crate::config::Conventions;
use crate::codes::CodeListExtractor;
use crate::error::RuleResult;
use crate::flatten::RuleFlattener;
use crate::parser::parse_fragment_with;
use crate::record::{RuleClass, RuleRecord};

/// Extracts rule records from fragments under one set of conventions.
///
/// Each call handles one fragment and yields either all of its records or
/// an error; fragments share no state.
///
/// # Example
///
/// ```rust
/// use med_rules::{RuleClass, RuleExtractor};
///
/// let extractor = RuleExtractor::new();
/// let records = extractor
///     .name_rules(
///         "(regexp_like(a.RAW_RX_MED_NAME,'Metformin','i') and not (\
///            regexp_like(a.RAW_RX_MED_NAME,'Kazano','i') or \
///            regexp_like(a.RAW_RX_MED_NAME,'Invokamet','i'))) or \
///          regexp_like(a.RAW_RX_MED_NAME,'Glucophage','i')",
///         &RuleClass::by_name(Some(0), "Biguanide"),
///     )
///     .unwrap();
/// assert_eq!(records.len(), 3);
/// assert_eq!(records[1].exclusion_pattern.as_deref(), Some("Invokamet"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleExtractor {
    conventions: Conventions,
}

impl RuleExtractor {
    /// Creates an extractor with the default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor with custom conventions.
    pub fn with_conventions(conventions: Conventions) -> Self {
        Self { conventions }
    }

    /// The conventions in use.
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Parses and flattens a name-condition fragment.
    pub fn name_rules(&self, fragment: &str, class: &RuleClass) -> RuleResult<Vec<RuleRecord>> {
        let root = parse_fragment_with(fragment, self.conventions.tokenizer)?;
        RuleFlattener::new(&self.conventions).flatten(&root, class)
    }

    /// Extracts the code list of a code fragment.
    pub fn code_rules(&self, fragment: &str, class: &RuleClass) -> RuleResult<Vec<RuleRecord>> {
        CodeListExtractor::new(&self.conventions).extract(fragment, class)
    }
}

/// Extracts name rules from a fragment using the default conventions.
pub fn extract_name_rules(fragment: &str, class: &RuleClass) -> RuleResult<Vec<RuleRecord>> {
    RuleExtractor::new().name_rules(fragment, class)
}

/// Extracts code rules from a fragment using the default conventions.
pub fn extract_code_rules(fragment: &str, class: &RuleClass) -> RuleResult<Vec<RuleRecord>> {
    RuleExtractor::new().code_rules(fragment, class)
}
