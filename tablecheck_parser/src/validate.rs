//! Structural checks on a parsed suite.

use crate::{ParserError, Result};
use tablecheck_core::{CheckSpec, Suite, first_duplicate};

/// Rejects suites whose declarations can never run.
///
/// Only the suite itself is inspected. Whether tables and columns exist is
/// decided against the catalog at run time.
pub fn validate_suite(suite: &Suite) -> Result<()> {
    if suite.name.trim().is_empty() {
        return Err(ParserError::invalid("<suite>", "suite name is empty"));
    }

    for check in &suite.checks {
        validate_check(check)?;
    }

    let labels: Vec<String> = suite.checks.iter().map(CheckSpec::label).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    if let Some(label) = first_duplicate(&labels) {
        return Err(ParserError::invalid(
            label,
            "another check has the same name; give one of them an explicit `name`",
        ));
    }
    Ok(())
}

fn validate_check(check: &CheckSpec) -> Result<()> {
    let invalid = |reason: String| ParserError::invalid(check.label(), reason);

    if check.table().trim().is_empty() {
        return Err(invalid("table name is empty".to_string()));
    }

    match check {
        CheckSpec::PrimaryKey { columns, .. } => {
            if columns.is_empty() {
                return Err(invalid("key column list is empty".to_string()));
            }
            if let Some(column) = duplicate(columns) {
                return Err(invalid(format!("key column '{column}' is listed twice")));
            }
        }
        CheckSpec::ForeignKey {
            reference,
            keys,
            ref_keys,
            optional,
            ..
        } => {
            if reference.trim().is_empty() {
                return Err(invalid("reference table name is empty".to_string()));
            }
            if keys.is_empty() {
                return Err(invalid("key column list is empty".to_string()));
            }
            if let Some(ref_keys) = ref_keys
                && ref_keys.len() != keys.len()
            {
                return Err(invalid(format!(
                    "{} reference keys for {} keys",
                    ref_keys.len(),
                    keys.len()
                )));
            }
            if optional.len() != 1 && optional.len() != keys.len() {
                return Err(invalid(format!(
                    "{} optional flags for {} keys (expected 1 or {})",
                    optional.len(),
                    keys.len(),
                    keys.len()
                )));
            }
        }
        CheckSpec::Required { optional, .. } => {
            if let Some(column) = duplicate(optional) {
                return Err(invalid(format!("optional column '{column}' is listed twice")));
            }
        }
        CheckSpec::ColumnTypes { types, .. } => {
            if types.is_empty() {
                return Err(invalid("no column types declared".to_string()));
            }
            let columns: Vec<String> = types.iter().map(|t| t.column.clone()).collect();
            if let Some(column) = duplicate(&columns) {
                return Err(invalid(format!("column '{column}' is declared twice")));
            }
            if let Some(spec) = types.iter().find(|t| t.type_tag.trim().is_empty()) {
                return Err(invalid(format!("column '{}' has an empty type", spec.column)));
            }
        }
        CheckSpec::RangeContiguous { start, end, by, .. } => {
            if start.trim().is_empty() || end.trim().is_empty() {
                return Err(invalid("start and end columns must be named".to_string()));
            }
            if let Some(by) = by
                && let Some(column) = by.iter().find(|c| *c == start || *c == end)
            {
                return Err(invalid(format!(
                    "range column '{column}' cannot also be a group key"
                )));
            }
        }
    }
    Ok(())
}

fn duplicate(names: &[String]) -> Option<String> {
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    first_duplicate(&names).map(str::to_string)
}
