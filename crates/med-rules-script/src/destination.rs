//! Classification derived from destination table names.
//!
//! Medication inserts write to tables named `<Drug>By<Tag>_<suffix>`, e.g.
//! `SulfonylureaByRXNORM_initial` or `BiguanideByNames_initial`.

use med_rules::{MatchMethod, RuleClass};

use crate::error::{ScriptError, ScriptResult};

/// Splits a destination name into drug name and match method.
pub fn destination_class(destination: &str, group_id: Option<i32>) -> ScriptResult<RuleClass> {
    let stem = destination
        .rsplit_once('_')
        .map_or(destination, |(stem, _)| stem);
    let (drug, tag) = stem
        .split_once("By")
        .ok_or_else(|| ScriptError::InvalidDestination(destination.to_string()))?;
    if drug.is_empty() {
        return Err(ScriptError::InvalidDestination(destination.to_string()));
    }

    let method = MatchMethod::from_tag(tag).ok_or_else(|| ScriptError::UnknownMatchTag {
        destination: destination.to_string(),
        tag: tag.to_string(),
    })?;
    Ok(RuleClass::new(group_id, drug, method))
}
