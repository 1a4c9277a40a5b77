//! Medication insert statements of a generated SQL script.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use med_rules::{RuleExtractor, RuleRecord};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ScriptConfig;
use crate::destination::destination_class;
use crate::error::{ScriptError, ScriptResult};
use crate::labs;

/// One `insert into <destination> ... from PRESCRIBING ...` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedInsert<'s> {
    /// Group of the most recent heading before the statement.
    pub group_id: Option<i32>,
    /// Destination table name.
    pub destination: &'s str,
    /// Full statement text.
    pub statement: &'s str,
}

/// A SQL script holding medication inserts.
///
/// # Example
///
/// ```rust
/// use med_rules_script::MedicationScript;
///
/// let sql = "insert into SulfonylureaByRXNORM_initial\n\
///            select * from PRESCRIBING a\n\
///            where a.RXNORM_CUI in (3842,153843);\n";
/// let records = MedicationScript::new(sql).med_info().unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].drug_name, "Sulfonylurea");
/// ```
#[derive(Debug, Clone)]
pub struct MedicationScript<'s> {
    sql: &'s str,
    config: ScriptConfig,
    extractor: RuleExtractor,
}

impl<'s> MedicationScript<'s> {
    /// Wraps a script using the default configuration.
    pub fn new(sql: &'s str) -> Self {
        Self::with_config(sql, ScriptConfig::default())
    }

    /// Wraps a script using a custom configuration.
    pub fn with_config(sql: &'s str, config: ScriptConfig) -> Self {
        let extractor = RuleExtractor::with_conventions(config.conventions.clone());
        Self {
            sql,
            config,
            extractor,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Splits the script on `;` at the end of a line.
    pub fn statements(&self) -> Vec<&'s str> {
        let sql = self.sql;
        let mut statements = Vec::new();
        let mut start = 0;
        for (ix, _) in sql.match_indices(';') {
            let rest = &sql[ix + 1..];
            if rest.starts_with('\n') || rest.starts_with("\r\n") {
                statements.push(&sql[start..ix]);
                start = ix + 1;
            }
        }
        statements.push(&sql[start..]);
        statements
    }

    /// Finds the medication inserts along with their groups.
    pub fn med_inserts(&self) -> ScriptResult<Vec<MedInsert<'s>>> {
        let mut group_id = None;
        let mut inserts = Vec::new();

        for statement in self.statements() {
            if let Some(id) = self.heading_group(statement) {
                group_id = Some(id);
            }
            let Some((_, after)) = statement.split_once(self.config.insert_marker.as_str()) else {
                continue;
            };
            if !statement.contains(self.config.source_table.as_str()) {
                continue;
            }

            let destination = after
                .split_whitespace()
                .next()
                .ok_or_else(|| ScriptError::MissingDestination(statement.trim().to_string()))?;
            trace!("insert into {} (group {:?})", destination, group_id);
            inserts.push(MedInsert {
                group_id,
                destination,
                statement,
            });
        }
        Ok(inserts)
    }

    /// The name condition after the configured start, without its closing
    /// parenthesis.
    ///
    /// The condition ends at the configured trailing filter, or at the end of
    /// the statement when there is none.
    pub fn name_condition<'a>(&self, statement: &'a str) -> Option<&'a str> {
        let (_, after) = statement.split_once(self.config.condition_start.as_str())?;
        let condition = after
            .split_once(self.config.condition_end.as_str())
            .map_or(after, |(condition, _)| condition);
        condition.trim().strip_suffix(')').map(str::trim)
    }

    /// Extracts the records of one insert.
    pub fn extract_insert(&self, insert: &MedInsert<'_>) -> ScriptResult<Vec<RuleRecord>> {
        let class = destination_class(insert.destination, insert.group_id)?;
        let records = if insert.statement.contains(self.config.code_column.as_str()) {
            self.extractor.code_rules(insert.statement, &class)
        } else {
            let condition = self.name_condition(insert.statement).ok_or_else(|| {
                ScriptError::MissingCondition {
                    destination: insert.destination.to_string(),
                }
            })?;
            self.extractor.name_rules(condition, &class)
        };
        let records = records.map_err(|err| ScriptError::rule(insert.destination, err))?;
        debug!("{}: {} records", insert.destination, records.len());
        Ok(records)
    }

    /// Extracts every insert independently, keeping failures per insert.
    pub fn extract_each(&self) -> ScriptResult<Vec<(MedInsert<'s>, ScriptResult<Vec<RuleRecord>>)>> {
        Ok(self
            .med_inserts()?
            .into_iter()
            .map(|insert| {
                let records = self.extract_insert(&insert);
                (insert, records)
            })
            .collect())
    }

    /// Extracts the records of all inserts in script order.
    ///
    /// Fails on the first insert that does not extract.
    pub fn med_info(&self) -> ScriptResult<Vec<RuleRecord>> {
        let inserts = self.med_inserts()?;

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            let batches: Vec<Vec<RuleRecord>> = inserts
                .par_iter()
                .map(|insert| self.extract_insert(insert))
                .collect::<ScriptResult<_>>()?;
            return Ok(batches.into_iter().flatten().collect());
        }

        let mut records = Vec::new();
        for insert in &inserts {
            records.extend(self.extract_insert(insert)?);
        }
        Ok(records)
    }

    /// Collects the lab code lists of the script.
    pub fn lab_code_lists(&self) -> ScriptResult<BTreeMap<String, BTreeSet<String>>> {
        labs::lab_code_lists(self.sql, &self.config.lab_marker)
    }

    /// Markers are checked in configured order; the last one present wins.
    fn heading_group(&self, statement: &str) -> Option<i32> {
        let mut found = None;
        let mut heading = String::new();
        for (id, marker) in &self.config.group_markers {
            heading.clear();
            heading.push_str(&self.config.group_prefix);
            heading.push_str(marker);
            if statement.contains(heading.as_str()) {
                found = Some(*id);
            }
        }
        found
    }
}
