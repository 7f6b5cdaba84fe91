//! Functional relationships between columns of two tables.

use tablecheck_core::{CheckError, Column, ConfigError, Table, Value, ValidationError};
use tracing::{debug, instrument};

/// Verifies that `table1[col1]` is exactly `transform(table2[col2])`.
///
/// Without `by` the comparison is positional over the whole columns: same
/// length, same values, same order. With `by` both tables are partitioned by
/// the group key (which must exist in both), groups are taken in key order and
/// the transform is applied to each group of `table2` separately. The
/// resulting `(key, value)` sequence must then equal the one of `table1`.
///
/// The check is binary. A mismatch yields one validation error without an
/// itemized report.
///
/// # Example
///
/// ```rust
/// use tablecheck_core::{Column, TableBuilder, Value};
/// use tablecheck_validator::check_column_relation;
///
/// let prices = TableBuilder::new().column("net", [10, 20]).build().unwrap();
/// let totals = TableBuilder::new().column("gross", [20, 40]).build().unwrap();
///
/// let double = |c: &Column| -> anyhow::Result<Column> {
///     let values: Vec<Value> = c
///         .values()
///         .iter()
///         .map(|v| v.as_int().map(|x| x * 2).into())
///         .collect();
///     Ok(Column::new(c.name(), values)?)
/// };
///
/// assert!(check_column_relation(&totals, &prices, "gross", "net", double, None).is_ok());
/// ```
#[instrument(
    level = "debug",
    skip(table1, table2, transform),
    fields(rows1 = table1.num_rows(), rows2 = table2.num_rows())
)]
pub fn check_column_relation<F>(
    table1: &Table,
    table2: &Table,
    col1: &str,
    col2: &str,
    transform: F,
    by: Option<&[&str]>,
) -> Result<(), CheckError>
where
    F: Fn(&Column) -> anyhow::Result<Column>,
{
    let by = by.unwrap_or(&[]);
    table1.require_columns(&[col1])?;
    table2.require_columns(&[col2])?;
    table1.require_columns(by)?;
    table2.require_columns(by)?;

    let target = table1.column(col1)?;
    let source = table2.column(col2)?;

    let holds = if by.is_empty() {
        let mapped = apply(&transform, source)?;
        mapped.values() == target.values()
    } else {
        let expected = keyed_values(table1, target, by, |column| Ok(column))?;
        let actual = keyed_values(table2, source, by, |column| apply(&transform, &column))?;
        debug!(groups = expected.len(), "relation groups compared");
        expected == actual
    };

    if holds {
        return Ok(());
    }

    let scope = if by.is_empty() {
        String::new()
    } else {
        format!(" within groups of [{}]", by.join(", "))
    };
    Err(ValidationError::summary(
        "relation",
        format!("Column '{col1}' is not the transformed column '{col2}'{scope}"),
    )
    .into())
}

fn apply<F>(transform: &F, column: &Column) -> Result<Column, ConfigError>
where
    F: Fn(&Column) -> anyhow::Result<Column>,
{
    transform(column).map_err(|e| ConfigError::TransformFailed(format!("{e:#}")))
}

/// Flattens a column into `(group key, value)` pairs, groups in key order and
/// rows in table order within each group. `map` sees each group's slice.
fn keyed_values(
    table: &Table,
    column: &Column,
    by: &[&str],
    map: impl Fn(Column) -> Result<Column, ConfigError>,
) -> Result<Vec<(Vec<Value>, Value)>, ConfigError> {
    let mut groups = table.group_by(by)?;
    groups.sort_by(|a, b| a.key.cmp(&b.key));

    let mut pairs = Vec::with_capacity(table.num_rows());
    for group in groups {
        let slice = map(column.take(&group.rows))?;
        pairs.extend(
            slice
                .values()
                .iter()
                .map(|value| (group.key.clone(), value.clone())),
        );
    }
    Ok(pairs)
}
