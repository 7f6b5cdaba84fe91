//! Required-value presence.

use tablecheck_core::{CheckError, Table, Violations, ensure_none};
use tracing::{debug, instrument};

/// Verifies that no column outside `optional` holds a missing value.
///
/// The report lists, per offending column, the 0-based row indices of the
/// missing values.
#[instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn check_no_required_values_missing(table: &Table, optional: &[&str]) -> Result<(), CheckError> {
    table.require_columns(optional)?;

    let missing: Vec<(String, Vec<String>)> = table
        .columns()
        .iter()
        .filter(|c| !optional.contains(&c.name()))
        .map(|c| {
            let rows = c.null_positions().iter().map(ToString::to_string).collect();
            (c.name().to_string(), rows)
        })
        .collect();

    let violations = Violations::keyed(missing);
    debug!(missing = violations.len(), "required values scanned");

    ensure_none(
        "required",
        "Required values are missing (column: rows):",
        violations,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tablecheck_core::{ConfigError, TableBuilder};

    fn table() -> Table {
        TableBuilder::new()
            .column("a", [Some(1), None])
            .column("b", [Some(1), Some(2)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_value_reported_by_row() {
        let err = check_no_required_values_missing(&table(), &[]).unwrap_err();
        let violations = err.as_validation().unwrap().violations().unwrap();
        assert_eq!(violations.get("a"), Some(&["1".to_string()][..]));
        assert_eq!(violations.get("b"), None);
        assert_eq!(
            err.to_string(),
            "Required values are missing (column: rows):\n  a: 1"
        );
    }

    #[test]
    fn test_optional_column_exempt() {
        assert!(check_no_required_values_missing(&table(), &["a"]).is_ok());
    }

    #[test]
    fn test_unknown_optional_column() {
        let err = check_no_required_values_missing(&table(), &["c"]).unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::column_not_found(["c"])));
    }

    #[test]
    fn test_empty_table_passes() {
        assert!(check_no_required_values_missing(&Table::empty(), &[]).is_ok());
    }
}
