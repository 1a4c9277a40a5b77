//! Output rows describing medication-matching rules.

use std::fmt;

/// A medication code (RxNorm concept unique identifier).
pub type Code = u64;

/// How a rule identifies a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchMethod {
    /// By numeric code (`RXNORM`).
    ByCode,
    /// By case-insensitive name pattern (`Names`).
    ByName,
}

impl MatchMethod {
    /// The tag used for this method in destination table names.
    pub fn tag(self) -> &'static str {
        match self {
            MatchMethod::ByCode => "RXNORM",
            MatchMethod::ByName => "Names",
        }
    }

    /// Looks up a method by its destination-table tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "RXNORM" => Some(MatchMethod::ByCode),
            "Names" => Some(MatchMethod::ByName),
            _ => None,
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Caller-supplied classification copied onto every record of a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleClass {
    /// Group the rule belongs to (1 = diabetes-specific, 0 = non-specific).
    pub group_id: Option<i32>,
    /// Drug class name, e.g. `Sulfonylurea`.
    pub drug_name: String,
    /// How the fragment matches medications.
    pub match_method: MatchMethod,
}

impl RuleClass {
    /// Creates a classification.
    pub fn new(group_id: Option<i32>, drug_name: impl Into<String>, match_method: MatchMethod) -> Self {
        Self {
            group_id,
            drug_name: drug_name.into(),
            match_method,
        }
    }

    /// Classification for a name-pattern fragment.
    pub fn by_name(group_id: Option<i32>, drug_name: impl Into<String>) -> Self {
        Self::new(group_id, drug_name, MatchMethod::ByName)
    }

    /// Classification for a code-list fragment.
    pub fn by_code(group_id: Option<i32>, drug_name: impl Into<String>) -> Self {
        Self::new(group_id, drug_name, MatchMethod::ByCode)
    }
}

/// One normalized medication-matching rule.
///
/// Exactly one of `code` and `pattern` is set, according to `match_method`.
/// `exclusion_pattern` is only set for rules of the form
/// `pattern and not (exclusion or ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleRecord {
    /// Group the rule belongs to.
    pub group_id: Option<i32>,
    /// Drug class name.
    pub drug_name: String,
    /// Whether `code` or `pattern` identifies the medication.
    pub match_method: MatchMethod,
    /// Medication code for `ByCode` rules.
    pub code: Option<Code>,
    /// Name pattern for `ByName` rules.
    pub pattern: Option<String>,
    /// Pattern whose matches are excluded from `pattern`.
    pub exclusion_pattern: Option<String>,
    /// Documentation comment found next to the rule.
    pub note: Option<String>,
}

impl RuleRecord {
    /// Column names in field order, as used by tabular exports.
    pub const FIELDS: [&'static str; 7] =
        ["dm_drug", "drug", "by", "code", "pattern", "but_not", "note"];

    pub(crate) fn name_rule(
        class: &RuleClass,
        pattern: String,
        exclusion_pattern: Option<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            group_id: class.group_id,
            drug_name: class.drug_name.clone(),
            match_method: MatchMethod::ByName,
            code: None,
            pattern: Some(pattern),
            exclusion_pattern,
            note,
        }
    }

    pub(crate) fn code_rule(class: &RuleClass, code: Code) -> Self {
        Self {
            group_id: class.group_id,
            drug_name: class.drug_name.clone(),
            match_method: MatchMethod::ByCode,
            code: Some(code),
            pattern: None,
            exclusion_pattern: None,
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_method_tags() {
        assert_eq!(MatchMethod::ByCode.to_string(), "RXNORM");
        assert_eq!(MatchMethod::ByName.to_string(), "Names");
        assert_eq!(MatchMethod::from_tag("RXNORM"), Some(MatchMethod::ByCode));
        assert_eq!(MatchMethod::from_tag("Names"), Some(MatchMethod::ByName));
        assert_eq!(MatchMethod::from_tag("names"), None);
    }

    #[test]
    fn test_name_rule_sets_pattern_only() {
        let class = RuleClass::by_name(Some(0), "Biguanide");
        let record = RuleRecord::name_rule(&class, "Metformin".into(), Some("Kazano".into()), None);
        assert_eq!(record.match_method, MatchMethod::ByName);
        assert_eq!(record.pattern.as_deref(), Some("Metformin"));
        assert_eq!(record.exclusion_pattern.as_deref(), Some("Kazano"));
        assert!(record.code.is_none());
        assert_eq!(record.drug_name, "Biguanide");
        assert_eq!(record.group_id, Some(0));
    }

    #[test]
    fn test_code_rule_sets_code_only() {
        let class = RuleClass::by_code(Some(1), "Sulfonylurea");
        let record = RuleRecord::code_rule(&class, 3842);
        assert_eq!(record.match_method, MatchMethod::ByCode);
        assert_eq!(record.code, Some(3842));
        assert!(record.pattern.is_none());
        assert!(record.exclusion_pattern.is_none());
        assert!(record.note.is_none());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(RuleRecord::FIELDS[0], "dm_drug");
        assert_eq!(RuleRecord::FIELDS[5], "but_not");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_record_serializes() {
        let class = RuleClass::by_code(None, "GLP1Aex");
        let record = RuleRecord::code_rule(&class, 1727493);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["code"], 1727493);
        assert_eq!(json["match_method"], "ByCode");
        assert!(json["pattern"].is_null());
    }
}
