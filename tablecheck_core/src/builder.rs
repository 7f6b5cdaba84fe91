//! Builder pattern for creating tables and suites.
//!
//! This module provides ergonomic builders for constructing tables and
//! check suites with a fluent API.

use crate::{CheckSpec, Column, ColumnTypeSpec, ConfigError, NumberSpec, Suite, Table, Value};

/// Builder for creating a [`Table`] column by column.
///
/// Errors (mixed column types, ragged or duplicate columns) surface from
/// [`build`](TableBuilder::build).
///
/// # Example
///
/// ```rust
/// use tablecheck_core::TableBuilder;
///
/// let table = TableBuilder::new()
///     .column("id", [1, 2, 3])
///     .column("name", ["a", "b", "c"])
///     .build()
///     .unwrap();
/// assert_eq!(table.num_rows(), 3);
/// ```
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<Result<Column, ConfigError>>,
}

impl TableBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column from convertible values.
    pub fn column<T: Into<Value>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.columns.push(Column::from_values(name, values));
        self
    }

    /// Adds a column with an explicit type tag.
    pub fn tagged_column<T: Into<Value>>(
        mut self,
        name: impl Into<String>,
        tag: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.columns
            .push(Column::from_values(name, values).map(|c| c.with_type_tag(tag)));
        self
    }

    /// Adds an already built column.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(Ok(column));
        self
    }

    /// Builds the table.
    pub fn build(self) -> Result<Table, ConfigError> {
        let columns = self.columns.into_iter().collect::<Result<Vec<_>, _>>()?;
        Table::new(columns)
    }
}

/// Builder for creating a [`Suite`].
///
/// # Example
///
/// ```rust
/// use tablecheck_core::SuiteBuilder;
///
/// let suite = SuiteBuilder::new("orders")
///     .description("Integrity rules for the orders mart")
///     .primary_key("orders", &["order_id"])
///     .foreign_key("orders", "customers", &["customer_id"], Some(&["id"]), &[true])
///     .required("orders", &["note"])
///     .build();
/// assert_eq!(suite.checks.len(), 3);
/// ```
#[derive(Debug)]
pub struct SuiteBuilder {
    name: String,
    description: Option<String>,
    checks: Vec<CheckSpec>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl SuiteBuilder {
    /// Creates a new suite builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            checks: Vec::new(),
        }
    }

    /// Sets the suite description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an arbitrary check.
    pub fn check(mut self, check: CheckSpec) -> Self {
        self.checks.push(check);
        self
    }

    /// Adds a primary key check.
    pub fn primary_key(self, table: &str, columns: &[&str]) -> Self {
        self.check(CheckSpec::PrimaryKey {
            name: None,
            table: table.to_string(),
            columns: owned(columns),
        })
    }

    /// Adds a foreign key check.
    pub fn foreign_key(
        self,
        table: &str,
        reference: &str,
        keys: &[&str],
        ref_keys: Option<&[&str]>,
        optional: &[bool],
    ) -> Self {
        self.check(CheckSpec::ForeignKey {
            name: None,
            table: table.to_string(),
            reference: reference.to_string(),
            keys: owned(keys),
            ref_keys: ref_keys.map(owned),
            optional: optional.to_vec(),
        })
    }

    /// Adds a required-values check.
    pub fn required(self, table: &str, optional: &[&str]) -> Self {
        self.check(CheckSpec::Required {
            name: None,
            table: table.to_string(),
            optional: owned(optional),
        })
    }

    /// Adds a column type check. Each entry is `(column, type, inherit)`.
    pub fn column_types(self, table: &str, types: &[(&str, &str, bool)]) -> Self {
        self.check(CheckSpec::ColumnTypes {
            name: None,
            table: table.to_string(),
            types: types
                .iter()
                .map(|(column, type_tag, inherit)| ColumnTypeSpec {
                    column: column.to_string(),
                    type_tag: type_tag.to_string(),
                    inherit: *inherit,
                })
                .collect(),
        })
    }

    /// Adds a range contiguity check.
    pub fn range_contiguous(
        self,
        table: &str,
        start: &str,
        end: &str,
        spacing: NumberSpec,
        by: Option<&[&str]>,
    ) -> Self {
        self.check(CheckSpec::RangeContiguous {
            name: None,
            table: table.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            spacing,
            by: by.map(owned),
        })
    }

    /// Builds the suite.
    pub fn build(self) -> Suite {
        Suite {
            name: self.name,
            description: self.description,
            checks: self.checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builder_surfaces_column_errors() {
        let err = TableBuilder::new()
            .column("a", [Value::Int(1), Value::from("x")])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MixedColumnTypes { .. }));
    }

    #[test]
    fn test_tagged_column() {
        let table = TableBuilder::new()
            .tagged_column("price", "currency", [1.5, 2.0])
            .build()
            .unwrap();
        assert_eq!(table.column("price").unwrap().type_tag(), "currency");
    }

    #[test]
    fn test_suite_builder() {
        let suite = SuiteBuilder::new("s")
            .column_types("t", &[("id", "integer", false)])
            .range_contiguous("t", "from", "to", NumberSpec::Int(1), Some(&["id"]))
            .build();
        assert_eq!(suite.name, "s");
        assert_eq!(suite.checks[0].kind(), "column_types");
        assert_eq!(suite.checks[1].label(), "range_contiguous(t)");
    }
}
