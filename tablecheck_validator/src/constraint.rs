//! Row and group predicates.
//!
//! A predicate is a closure from a table view to a boolean column with one
//! entry per row of the view. It should read only the columns of the view it
//! is handed: under grouping the view is a single group, which is what makes
//! constraints such as "value below its group's mean" expressible without
//! pre-joining aggregates.
//!
//! Grouped evaluation runs in three explicit phases:
//!
//! 1. partition the rows, keeping each group's original row indices
//! 2. evaluate the predicate on every group and verify its shape
//! 3. map failing positions back to original rows through those indices

use tablecheck_core::{CheckError, Column, ConfigError, DataType, Table, Value, Violations, ensure_none};
use tracing::{debug, instrument};

/// Verifies that `predicate` holds for every row of `table`, optionally
/// evaluated separately within each group of `by`.
///
/// A missing result counts as a violation. Every violating row is reported
/// together with its original row index.
///
/// # Errors
///
/// * [`ConfigError::ColumnNotFound`] if a `by` column does not exist
/// * [`ConfigError::PredicateFailed`] if the predicate returns an error, for
///   example because it asked the view for a column it does not have
/// * [`ConfigError::PredicateNotBoolean`] if the result is not boolean
/// * [`ConfigError::PredicateShape`] if the result does not have exactly one
///   entry per row (per group row when grouped)
/// * a validation error listing the violating rows
///
/// # Example
///
/// ```rust
/// use tablecheck_core::{Column, Table, TableBuilder};
/// use tablecheck_validator::check_table_constraint;
///
/// let table = TableBuilder::new().column("x", [1, -1, 2]).build().unwrap();
///
/// let positive = |t: &Table| -> anyhow::Result<Column> {
///     Ok(t.column("x")?.test(|v| v.as_int().is_some_and(|x| x > 0)))
/// };
/// let err = check_table_constraint(&table, positive, None).unwrap_err();
/// assert!(err.is_validation());
/// ```
#[instrument(level = "debug", skip(table, predicate), fields(rows = table.num_rows()))]
pub fn check_table_constraint<F>(
    table: &Table,
    predicate: F,
    by: Option<&[&str]>,
) -> Result<(), CheckError>
where
    F: Fn(&Table) -> anyhow::Result<Column>,
{
    let by = by.unwrap_or(&[]);

    let mut failing: Vec<usize> = if by.is_empty() {
        let result = evaluate(&predicate, table, None)?;
        violating_positions(&result)
    } else {
        let groups = table.group_by(by)?;
        let mut failing = Vec::new();
        for group in &groups {
            let view = table.take(&group.rows);
            let result = evaluate(&predicate, &view, Some(group.describe(by)))?;
            failing.extend(
                violating_positions(&result)
                    .into_iter()
                    .map(|position| group.rows[position]),
            );
        }
        failing.sort_unstable();
        failing
    };
    failing.dedup();

    debug!(violations = failing.len(), "constraint evaluated");

    let offending = table.take(&failing);
    ensure_none(
        "constraint",
        "Constraint violated by rows:",
        Violations::rows(offending, Some(failing)),
    )?;
    Ok(())
}

fn evaluate<F>(predicate: &F, view: &Table, group: Option<String>) -> Result<Column, ConfigError>
where
    F: Fn(&Table) -> anyhow::Result<Column>,
{
    let result = predicate(view).map_err(|e| ConfigError::PredicateFailed(format!("{e:#}")))?;

    if !matches!(result.data_type(), DataType::Bool | DataType::Null) {
        return Err(ConfigError::PredicateNotBoolean(result.data_type()));
    }
    if result.len() != view.num_rows() {
        return Err(ConfigError::PredicateShape {
            group,
            expected: view.num_rows(),
            actual: result.len(),
        });
    }
    Ok(result)
}

/// Positions whose result is `false` or missing.
fn violating_positions(result: &Column) -> Vec<usize> {
    result
        .values()
        .iter()
        .enumerate()
        .filter(|(_, v)| !matches!(v, Value::Bool(true)))
        .map(|(i, _)| i)
        .collect()
}
