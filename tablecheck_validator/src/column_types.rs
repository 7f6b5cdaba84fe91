//! Column type conformance.
//!
//! Types are compared by tag. In strict mode the column's tag must equal the
//! expected one. In inherit mode the expected tag may also be any ancestor of
//! the column's tag in the supplied [`TypeHierarchy`].

use tablecheck_core::{
    CheckError, ConfigError, Table, TypeHierarchy, Violations, broadcast, ensure_none,
    first_duplicate, symmetric_diff,
};
use tracing::{debug, instrument};

/// Verifies that every column of `table` has its declared type.
///
/// `expected` holds `(column, type tag)` pairs and must name exactly the
/// table's columns. `inherit` holds one flag per entry, or a single flag
/// applied to all of them.
///
/// # Example
///
/// ```rust
/// use tablecheck_core::{TableBuilder, TypeHierarchy};
/// use tablecheck_validator::check_column_types;
///
/// let hierarchy = TypeHierarchy::default();
/// let prices = TableBuilder::new().column("x", [1.5, 2.0]).build().unwrap();
/// let counts = TableBuilder::new().column("x", [1, 2]).build().unwrap();
///
/// assert!(check_column_types(&prices, &[("x", "numeric")], &[false], &hierarchy).is_ok());
/// assert!(check_column_types(&counts, &[("x", "numeric")], &[false], &hierarchy).is_err());
/// assert!(check_column_types(&counts, &[("x", "numeric")], &[true], &hierarchy).is_ok());
/// ```
#[instrument(level = "debug", skip(table, hierarchy), fields(columns = table.num_columns()))]
pub fn check_column_types(
    table: &Table,
    expected: &[(&str, &str)],
    inherit: &[bool],
    hierarchy: &TypeHierarchy,
) -> Result<(), CheckError> {
    let declared: Vec<&str> = expected.iter().map(|(column, _)| *column).collect();
    if let Some(duplicate) = first_duplicate(&declared) {
        return Err(ConfigError::DuplicateColumn(duplicate.to_string()).into());
    }

    let diff = symmetric_diff(&table.column_names(), &declared);
    if !diff.is_empty() {
        return Err(ConfigError::ColumnSetMismatch {
            missing: diff.missing,
            extra: diff.extra,
        }
        .into());
    }

    let inherit = broadcast("inherit flags", inherit, expected.len())?;

    let mut mismatches = Vec::new();
    for column in table.columns() {
        let position = declared
            .iter()
            .position(|name| *name == column.name())
            .ok_or_else(|| ConfigError::column_not_found([column.name()]))?;
        let wanted = expected[position].1;
        let tag = column.type_tag();

        let mismatch = if inherit[position] {
            let lineage = hierarchy.lineage(tag);
            (!lineage.iter().any(|t| t == wanted))
                .then(|| format!("expected {wanted}, found {}", lineage.join(", ")))
        } else {
            (tag != wanted).then(|| format!("expected {wanted}, found {tag}"))
        };

        if let Some(message) = mismatch {
            mismatches.push((column.name().to_string(), vec![message]));
        }
    }

    debug!(mismatched = mismatches.len(), "column types compared");

    ensure_none(
        "column_types",
        "Column types do not match:",
        Violations::keyed(mismatches),
    )?;
    Ok(())
}
