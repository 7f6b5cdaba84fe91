//! Interval contiguity.
//!
//! Rows describe intervals `[start, end]`. Within a group, consecutive rows
//! must tile: each interval starts exactly `spacing` after the previous one
//! ended. A transition pairs the end of one row with the start of the next, so
//! the first row's start and the last row's end never take part.

use tablecheck_core::{
    CheckError, Column, ConfigError, DataType, Group, Spacing, Table, Value, Violations,
    ensure_none,
};
use tracing::{debug, instrument};

/// Verifies that consecutive `[start, end]` intervals are laid out exactly
/// `spacing` apart, optionally within each group of `by`.
///
/// Rows must already be ordered: within each group both columns have to be
/// non-decreasing in row order. The check never sorts, so a misordered input
/// is reported as a configuration error rather than silently reinterpreted.
///
/// Spacing is an exact requirement. Overlaps, gaps that are too small and gaps
/// that are too large all fail. Dates take an integer spacing in days and
/// datetimes an integer spacing in seconds; any other spacing kind is
/// `InvalidSpacing`. An end that overflows once spaced is a broken transition.
///
/// # Example
///
/// ```rust
/// use tablecheck_core::{Spacing, TableBuilder};
/// use tablecheck_validator::check_range_contiguous;
///
/// let periods = TableBuilder::new()
///     .column("from", [0, 2])
///     .column("to", [1, 3])
///     .build()
///     .unwrap();
///
/// let err = check_range_contiguous(&periods, "from", "to", &Spacing::zero(), None).unwrap_err();
/// assert!(err.to_string().contains("1 -> 2"));
/// ```
#[instrument(level = "debug", skip(table, spacing), fields(rows = table.num_rows()))]
pub fn check_range_contiguous(
    table: &Table,
    start: &str,
    end: &str,
    spacing: &Spacing,
    by: Option<&[&str]>,
) -> Result<(), CheckError> {
    let by = by.unwrap_or(&[]);
    table.require_columns(&[start, end])?;
    table.require_columns(by)?;

    let starts = table.column(start)?;
    let ends = table.column(end)?;
    check_range_types(starts, ends)?;

    if let Spacing::PerRow(values) = spacing
        && values.len() != table.num_rows()
    {
        return Err(ConfigError::length_mismatch("spacing", table.num_rows(), values.len()).into());
    }

    let groups = table.group_by(by)?;
    for group in &groups {
        if !is_sorted(group, starts) || !is_sorted(group, ends) {
            let label = (!by.is_empty()).then(|| group.describe(by));
            return Err(ConfigError::UnsortedRanges { group: label }.into());
        }
    }

    let mut broken = Vec::new();
    for group in &groups {
        for pair in group.rows.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let prev_end = &ends.values()[prev];
            let next_start = &starts.values()[next];
            let gap = match spacing {
                Spacing::Uniform(value) => value,
                Spacing::PerRow(values) => &values[prev],
            };

            if !prev_end.accepts_spacing(gap) {
                return Err(ConfigError::InvalidSpacing {
                    end: prev_end.to_string(),
                    spacing: gap.to_string(),
                }
                .into());
            }

            // An end that overflows when spaced has no successor to meet.
            let meets = prev_end
                .checked_add(gap)
                .is_some_and(|expected| same_point(&expected, next_start));
            if !meets {
                broken.push(format!("{prev_end} -> {next_start}"));
            }
        }
    }

    debug!(groups = groups.len(), broken = broken.len(), "transitions checked");

    ensure_none(
        "range_contiguous",
        format!("Ranges in [{start}, {end}] are not contiguous (end -> next start):"),
        Violations::Values(broken),
    )?;
    Ok(())
}

/// Numbers, dates and datetimes are three classes that do not mix.
fn range_class(data_type: DataType) -> Option<u8> {
    match data_type {
        DataType::Int | DataType::Float => Some(0),
        DataType::Date => Some(1),
        DataType::DateTime => Some(2),
        _ => None,
    }
}

fn check_range_types(starts: &Column, ends: &Column) -> Result<(), ConfigError> {
    for column in [starts, ends] {
        let data_type = column.data_type();
        if !data_type.is_range_like() && data_type != DataType::Null {
            return Err(ConfigError::NonNumericRange {
                column: column.name().to_string(),
                found: data_type,
            });
        }
    }

    if let (Some(a), Some(b)) = (
        range_class(starts.data_type()),
        range_class(ends.data_type()),
    ) && a != b
    {
        return Err(ConfigError::IncompatibleRange {
            start: starts.name().to_string(),
            start_type: starts.data_type(),
            end: ends.name().to_string(),
            end_type: ends.data_type(),
        });
    }

    for column in [starts, ends] {
        if column.values().iter().any(Value::is_null) {
            return Err(ConfigError::MissingRangeValues(column.name().to_string()));
        }
    }
    Ok(())
}

fn is_sorted(group: &Group, column: &Column) -> bool {
    let values = column.values();
    group
        .rows
        .windows(2)
        .all(|pair| values[pair[0]] <= values[pair[1]])
}

/// Equality across integer and float columns compares numerically.
fn same_point(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
            a.as_float() == b.as_float()
        }
        _ => a == b,
    }
}
