//! Quoted lab code lists such as `where l.LAB_LOINC in ('1558-6', '1493-6')`.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{ScriptError, ScriptResult};

/// Collects the code list of every line containing `marker`.
///
/// Each list is keyed by the alias of the enclosing `, <alias> as (` clause,
/// which sits two lines above the list.
pub fn lab_code_lists(sql: &str, marker: &str) -> ScriptResult<BTreeMap<String, BTreeSet<String>>> {
    let lines: Vec<&str> = sql.split('\n').collect();
    let mut lists = BTreeMap::new();

    for (ix, line) in lines.iter().enumerate() {
        if !line.contains(marker) {
            continue;
        }
        let malformed = || ScriptError::MalformedLabList { line: ix + 1 };

        let alias = ix
            .checked_sub(2)
            .and_then(|header| lines[header].split_whitespace().nth(1))
            .ok_or_else(malformed)?;
        let inside = line
            .split_once('(')
            .map(|(_, rest)| rest.split_once(')').map_or(rest, |(inside, _)| inside))
            .ok_or_else(malformed)?;
        let codes = quoted_values(inside).ok_or_else(malformed)?;

        debug!("lab list {} has {} codes", alias, codes.len());
        lists.insert(alias.to_string(), codes);
    }
    Ok(lists)
}

/// Parses `'a', 'b'` into its unquoted values.
fn quoted_values(text: &str) -> Option<BTreeSet<String>> {
    text.split(',')
        .map(|part| {
            let part = part.trim();
            part.strip_prefix('\'')
                .and_then(|p| p.strip_suffix('\''))
                .map(str::to_string)
        })
        .collect()
}
