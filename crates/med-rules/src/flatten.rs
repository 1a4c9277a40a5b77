//! Flattening of parsed name conditions into rule records.
//!
//! A name condition is a disjunction whose terms take one of two shapes:
//!
//! ```text
//! regexp_like(subject, 'P', 'i')                                  -> (P, -)
//! regexp_like(subject, 'P', 'i') and not (regexp_like(.., 'X1', ..)
//!                                      or regexp_like(.., 'X2', ..)) -> (P, X1), (P, X2)
//! ```
//!
//! Records come out in source order at both levels.

use log::debug;

use crate::ast::ExprNode;
use crate::config::Conventions;
use crate::error::{RuleError, RuleResult};
use crate::record::{MatchMethod, RuleClass, RuleRecord};
use crate::validate::CallValidator;

/// Turns a parsed name condition into records.
#[derive(Debug, Clone, Copy)]
pub struct RuleFlattener<'c> {
    validator: CallValidator<'c>,
}

impl<'c> RuleFlattener<'c> {
    /// Creates a flattener checking calls against the given conventions.
    pub fn new(conventions: &'c Conventions) -> Self {
        Self {
            validator: CallValidator::new(conventions),
        }
    }

    /// Flattens `root`, copying `class` onto every record.
    ///
    /// Fails without output on the first disjunct or conjunct of an
    /// unexpected shape.
    pub fn flatten(&self, root: &ExprNode, class: &RuleClass) -> RuleResult<Vec<RuleRecord>> {
        check_method(class)?;

        let ExprNode::Or(disjuncts) = root else {
            return Err(RuleError::structural(
                format!("name condition must be an OR, found {}", root.label()),
                root,
            ));
        };

        let mut records = Vec::with_capacity(disjuncts.len());
        for disjunct in disjuncts {
            self.push_disjunct(disjunct, class, &mut records)?;
        }

        debug!(
            "flattened {} disjuncts into {} {} records",
            disjuncts.len(),
            records.len(),
            class.drug_name
        );
        Ok(records)
    }

    /// Flattens a single disjunct: a pattern call or an exclusion conjunction.
    pub fn flatten_disjunct(
        &self,
        disjunct: &ExprNode,
        class: &RuleClass,
    ) -> RuleResult<Vec<RuleRecord>> {
        check_method(class)?;
        let mut records = Vec::new();
        self.push_disjunct(disjunct, class, &mut records)?;
        Ok(records)
    }

    fn push_disjunct(
        &self,
        disjunct: &ExprNode,
        class: &RuleClass,
        records: &mut Vec<RuleRecord>,
    ) -> RuleResult<()> {
        match disjunct {
            ExprNode::Call(_) => {
                let call = self.validator.validate(disjunct)?;
                records.push(RuleRecord::name_rule(class, call.pattern, None, call.note));
                Ok(())
            }
            ExprNode::And(conjuncts) => self.push_exclusions(disjunct, conjuncts, class, records),
            ExprNode::Or(_) | ExprNode::Not(_) => Err(RuleError::structural(
                format!("unexpected {} disjunct", disjunct.label()),
                disjunct,
            )),
        }
    }

    /// `outer and not (a or b ...) [and not (...)]` gives one record per
    /// excluded alternative.
    fn push_exclusions(
        &self,
        node: &ExprNode,
        conjuncts: &[ExprNode],
        class: &RuleClass,
        records: &mut Vec<RuleRecord>,
    ) -> RuleResult<()> {
        let mut calls = conjuncts.iter().filter(|c| matches!(c, ExprNode::Call(_)));
        let outer = match (calls.next(), calls.next()) {
            (Some(call), None) => self.validator.validate(call)?,
            _ => {
                return Err(RuleError::structural(
                    "AND must hold exactly one pattern call",
                    node,
                ))
            }
        };

        for conjunct in conjuncts {
            match conjunct {
                ExprNode::Call(_) => {}
                ExprNode::Not(negated) => {
                    let ExprNode::Or(alternatives) = negated.as_ref() else {
                        return Err(RuleError::structural(
                            format!("negated term must be an OR, found {}", negated.label()),
                            conjunct,
                        ));
                    };
                    for alternative in alternatives {
                        let excluded = self.validator.validate(alternative)?;
                        records.push(RuleRecord::name_rule(
                            class,
                            outer.pattern.clone(),
                            Some(excluded.pattern),
                            excluded.note,
                        ));
                    }
                }
                ExprNode::Or(_) | ExprNode::And(_) => {
                    return Err(RuleError::structural(
                        format!("unexpected {} conjunct", conjunct.label()),
                        conjunct,
                    ));
                }
            }
        }
        Ok(())
    }
}

fn check_method(class: &RuleClass) -> RuleResult<()> {
    if class.match_method != MatchMethod::ByName {
        return Err(RuleError::MatchMethod {
            expected: MatchMethod::ByName,
            found: class.match_method,
        });
    }
    Ok(())
}
