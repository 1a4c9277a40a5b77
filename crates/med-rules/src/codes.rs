//! Extraction of numeric code lists such as `a.RXNORM_CUI in (3842, 153843)`.

use log::debug;

use crate::config::Conventions;
use crate::error::{RuleError, RuleResult};
use crate::record::{Code, MatchMethod, RuleClass, RuleRecord};

/// Splits the code list following a fixed marker into `ByCode` records.
///
/// ```rust
/// use med_rules::{CodeListExtractor, Conventions, RuleClass};
///
/// let conventions = Conventions::default();
/// let class = RuleClass::by_code(Some(1), "Sulfonylurea");
/// let records = CodeListExtractor::new(&conventions)
///     .extract("a.RXNORM_CUI in (3842,153843,153844)", &class)
///     .unwrap();
/// let codes: Vec<_> = records.iter().filter_map(|r| r.code).collect();
/// assert_eq!(codes, vec![3842, 153843, 153844]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CodeListExtractor<'c> {
    marker: &'c str,
}

impl<'c> CodeListExtractor<'c> {
    /// Creates an extractor looking for the configured code marker.
    pub fn new(conventions: &'c Conventions) -> Self {
        Self {
            marker: &conventions.code_marker,
        }
    }

    /// Extracts one record per listed code, in list order.
    ///
    /// Only the first occurrence of the marker is read.
    pub fn extract(&self, fragment: &str, class: &RuleClass) -> RuleResult<Vec<RuleRecord>> {
        if class.match_method != MatchMethod::ByCode {
            return Err(RuleError::MatchMethod {
                expected: MatchMethod::ByCode,
                found: class.match_method,
            });
        }

        let start = fragment
            .find(self.marker)
            .map(|at| at + self.marker.len())
            .ok_or_else(|| RuleError::MissingMarker {
                marker: self.marker.to_string(),
            })?;
        let list = &fragment[start..];
        let end = list.find(')').ok_or_else(|| RuleError::UnterminatedList {
            marker: self.marker.to_string(),
        })?;

        let records = list[..end]
            .split(',')
            .map(|value| parse_code(value).map(|code| RuleRecord::code_rule(class, code)))
            .collect::<RuleResult<Vec<_>>>()?;

        debug!("extracted {} {} codes", records.len(), class.drug_name);
        Ok(records)
    }
}

fn parse_code(value: &str) -> RuleResult<Code> {
    let value = value.trim();
    value.parse::<Code>().map_err(|_| RuleError::InvalidCode {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(fragment: &str) -> RuleResult<Vec<RuleRecord>> {
        let conventions = Conventions::default();
        CodeListExtractor::new(&conventions).extract(fragment, &RuleClass::by_code(Some(1), "Sulfonylurea"))
    }

    fn codes(records: &[RuleRecord]) -> Vec<Code> {
        records.iter().filter_map(|r| r.code).collect()
    }

    #[test]
    fn test_codes_in_order() {
        let records = extract("a.RXNORM_CUI in (3842,153843,153844)").unwrap();
        assert_eq!(codes(&records), vec![3842, 153843, 153844]);
        for record in &records {
            assert_eq!(record.match_method, MatchMethod::ByCode);
            assert!(record.pattern.is_none());
            assert!(record.exclusion_pattern.is_none());
            assert_eq!(record.group_id, Some(1));
            assert_eq!(record.drug_name, "Sulfonylurea");
        }
    }

    #[test]
    fn test_list_inside_statement() {
        let fragment = "  where a.RXNORM_CUI in (3842, 153843,\r\n 153844) and a.RX_ORDER_DATE is not null";
        let records = extract(fragment).unwrap();
        assert_eq!(codes(&records), vec![3842, 153843, 153844]);
    }

    #[test]
    fn test_single_code() {
        assert_eq!(codes(&extract("a.RXNORM_CUI in (1804505)").unwrap()), vec![1804505]);
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            extract("a.NDC in (1, 2)").unwrap_err(),
            RuleError::MissingMarker {
                marker: "a.RXNORM_CUI in (".to_string(),
            }
        );
    }

    #[test]
    fn test_unterminated_list() {
        assert!(matches!(
            extract("a.RXNORM_CUI in (1, 2").unwrap_err(),
            RuleError::UnterminatedList { .. }
        ));
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(
            extract("a.RXNORM_CUI in (1, '2')").unwrap_err(),
            RuleError::InvalidCode {
                value: "'2'".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_list() {
        assert!(matches!(
            extract("a.RXNORM_CUI in ()").unwrap_err(),
            RuleError::InvalidCode { ref value } if value.is_empty()
        ));
    }

    #[test]
    fn test_name_classification_rejected() {
        let conventions = Conventions::default();
        let err = CodeListExtractor::new(&conventions)
            .extract("a.RXNORM_CUI in (1)", &RuleClass::by_name(None, "X"))
            .unwrap_err();
        assert!(matches!(err, RuleError::MatchMethod { .. }));
    }

    #[test]
    fn test_custom_marker() {
        let conventions = Conventions::builder().with_code_marker("cui IN (").build();
        let records = CodeListExtractor::new(&conventions)
            .extract("where cui IN (7, 8)", &RuleClass::by_code(None, "X"))
            .unwrap();
        assert_eq!(codes(&records), vec![7, 8]);
    }
}
