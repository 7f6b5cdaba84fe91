//! Primary key uniqueness.

use std::collections::HashSet;
use tablecheck_core::{CheckError, ConfigError, Table, Violations, ensure_none, row_key};
use tracing::{debug, instrument};

/// Verifies that no two rows share the same values on `key_columns`.
///
/// The first occurrence of each key is fine; every later repeat is a
/// violation. The report lists each duplicated key tuple once, in the order
/// the repeats were found. Missing values compare equal to each other.
///
/// # Errors
///
/// * [`ConfigError::EmptyKey`] if `key_columns` is empty
/// * [`ConfigError::ColumnNotFound`] if a key column does not exist
/// * a validation error listing the duplicated key tuples
///
/// # Example
///
/// ```rust
/// use tablecheck_core::TableBuilder;
/// use tablecheck_validator::check_primary_key_unique;
///
/// let orders = TableBuilder::new()
///     .column("order_id", [1, 2, 2])
///     .build()
///     .unwrap();
///
/// let err = check_primary_key_unique(&orders, &["order_id"]).unwrap_err();
/// assert!(err.is_validation());
/// ```
#[instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn check_primary_key_unique(table: &Table, key_columns: &[&str]) -> Result<(), CheckError> {
    if key_columns.is_empty() {
        return Err(ConfigError::EmptyKey.into());
    }
    table.require_columns(key_columns)?;

    let keys = key_columns
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicate_rows = Vec::new();

    let keyed =
        (0..table.num_rows()).filter_map(|row| row_key(&keys, row).map(|key| (row, key)));
    for (row, key) in keyed {
        if !seen.insert(key.clone()) && reported.insert(key) {
            duplicate_rows.push(row);
        }
    }

    debug!(duplicates = duplicate_rows.len(), "primary key scanned");

    let duplicates = table.select(key_columns)?.take(&duplicate_rows);
    ensure_none(
        "primary_key",
        format!(
            "Primary key [{}] is not unique; duplicated values:",
            key_columns.join(", ")
        ),
        Violations::rows(duplicates, None),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tablecheck_core::{TableBuilder, Value};

    #[test]
    fn test_unique_key_passes() {
        let table = TableBuilder::new().column("id", [1, 2, 3]).build().unwrap();
        assert!(check_primary_key_unique(&table, &["id"]).is_ok());
    }

    #[test]
    fn test_duplicates_reported_once() {
        let table = TableBuilder::new()
            .column("id", [1, 2, 1, 1, 3, 2])
            .build()
            .unwrap();

        let err = check_primary_key_unique(&table, &["id"]).unwrap_err();
        let violations = err.as_validation().unwrap().violations().unwrap();
        match violations {
            Violations::Rows { table, row_ids } => {
                assert_eq!(row_ids, &None);
                assert_eq!(
                    table.column("id").unwrap().values(),
                    &[Value::Int(1), Value::Int(2)]
                );
            }
            other => panic!("unexpected violations: {other:?}"),
        }
    }

    #[test]
    fn test_composite_key() {
        let table = TableBuilder::new()
            .column("a", [1, 1, 2])
            .column("b", ["x", "y", "x"])
            .build()
            .unwrap();
        assert!(check_primary_key_unique(&table, &["a", "b"]).is_ok());
        assert!(check_primary_key_unique(&table, &["a"]).is_err());
    }

    #[test]
    fn test_message_lists_tuples() {
        let table = TableBuilder::new()
            .column("a", [1, 1])
            .column("b", ["x", "x"])
            .build()
            .unwrap();
        let err = check_primary_key_unique(&table, &["b", "a"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Primary key [b, a] is not unique; duplicated values:\n  b  a\n  x  1"
        );
    }

    #[test]
    fn test_config_errors() {
        let table = TableBuilder::new().column("id", [1]).build().unwrap();
        let err = check_primary_key_unique(&table, &[]).unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::EmptyKey));

        let err = check_primary_key_unique(&table, &["nope"]).unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::column_not_found(["nope"])));
    }
}
