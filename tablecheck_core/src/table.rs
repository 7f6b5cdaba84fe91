//! In-memory tables.
//!
//! A [`Table`] is an ordered collection of equally long, uniquely named
//! [`Column`]s. Besides storage it provides the handful of primitives the
//! checks are written against: column lookup, projection, row selection and
//! order-preserving grouping.

use crate::error::ConfigError;
use crate::value::{DataType, Value};
use std::collections::{HashMap, HashSet};

/// A named, homogeneous sequence of values.
///
/// Non-null values all share one [`DataType`]; nulls may appear anywhere.
/// The type tag defaults to the data type's name and can be overridden to
/// carry a domain-specific type (see [`TypeHierarchy`](crate::TypeHierarchy)).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
    data_type: DataType,
    type_tag: String,
}

impl Column {
    /// Creates a column, inferring its data type from the values.
    ///
    /// Fails with [`ConfigError::MixedColumnTypes`] if non-null values differ
    /// in kind.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut data_type = DataType::Null;

        for value in &values {
            let kind = value.data_type();
            if kind == DataType::Null || kind == data_type {
                continue;
            }
            if data_type != DataType::Null {
                return Err(ConfigError::MixedColumnTypes {
                    column: name,
                    first: data_type,
                    second: kind,
                });
            }
            data_type = kind;
        }

        Ok(Self {
            name,
            values,
            data_type,
            type_tag: data_type.default_tag().to_string(),
        })
    }

    /// Creates a column from values that may be converted into [`Value`].
    pub fn from_values<T: Into<Value>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Self, ConfigError> {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    /// Creates a boolean column, where `None` is missing.
    pub fn from_bools(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Value::from).collect();
        let data_type = if values.iter().all(Value::is_null) {
            DataType::Null
        } else {
            DataType::Bool
        };
        Self {
            name: name.into(),
            values,
            data_type,
            type_tag: data_type.default_tag().to_string(),
        }
    }

    /// Overrides the type tag.
    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = tag.into();
        self
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the data type inferred from the values.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the declared type tag.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the indices of missing values.
    pub fn null_positions(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_null())
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns the column restricted to `rows`, in the given order.
    ///
    /// Panics if a row index is out of bounds.
    pub fn take(&self, rows: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            values: rows.iter().map(|&i| self.values[i].clone()).collect(),
            data_type: self.data_type,
            type_tag: self.type_tag.clone(),
        }
    }

    /// Maps every value to a boolean, propagating missing values.
    ///
    /// This is the usual building block for constraint predicates.
    pub fn test(&self, f: impl Fn(&Value) -> bool) -> Column {
        Column::from_bools(
            self.name.clone(),
            self.values
                .iter()
                .map(|v| if v.is_null() { None } else { Some(f(v)) }),
        )
    }

    /// Pairs this column with another of the same length and tests each pair.
    /// A missing value on either side yields a missing result.
    pub fn test_with(
        &self,
        other: &Column,
        f: impl Fn(&Value, &Value) -> bool,
    ) -> Result<Column, ConfigError> {
        if other.len() != self.len() {
            return Err(ConfigError::length_mismatch(
                format!("column '{}'", other.name),
                self.len(),
                other.len(),
            ));
        }
        Ok(Column::from_bools(
            self.name.clone(),
            self.values.iter().zip(&other.values).map(|(a, b)| {
                if a.is_null() || b.is_null() {
                    None
                } else {
                    Some(f(a, b))
                }
            }),
        ))
    }

    /// Mean of the non-missing numeric values, if any.
    pub fn mean(&self) -> Option<f64> {
        let numbers: Vec<f64> = self.values.iter().filter_map(Value::as_float).collect();
        if numbers.is_empty() {
            return None;
        }
        Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }
}

/// A partition of a table's rows sharing the same group-key values.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Group-key values, one per key column
    pub key: Vec<Value>,
    /// Original row indices, in table order
    pub rows: Vec<usize>,
}

impl Group {
    /// Returns the number of rows in the group.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the group has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the key as `col=value, ...` for error messages.
    pub fn describe(&self, columns: &[&str]) -> String {
        columns
            .iter()
            .zip(&self.key)
            .map(|(c, v)| format!("{c}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A table of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Creates an empty table with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a table from columns.
    ///
    /// Fails if two columns share a name or their lengths differ.
    pub fn new(columns: Vec<Column>) -> Result<Self, ConfigError> {
        let rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ConfigError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != rows {
                return Err(ConfigError::RaggedTable {
                    column: column.name().to_string(),
                    expected: rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Creates a table from row-major data.
    ///
    /// Every row must have one value per column name.
    pub fn from_rows(names: &[&str], rows: Vec<Vec<Value>>) -> Result<Self, ConfigError> {
        let mut data: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];

        for row in rows {
            if row.len() != names.len() {
                return Err(ConfigError::length_mismatch("row", names.len(), row.len()));
            }
            for (slot, value) in data.iter_mut().zip(row) {
                slot.push(value);
            }
        }

        let columns = names
            .iter()
            .zip(data)
            .map(|(name, values)| Column::new(*name, values))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns)
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Returns true if a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, ConfigError> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ConfigError::column_not_found([name]))
    }

    /// Verifies that every named column exists, reporting all absent ones.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), ConfigError> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| !self.has_column(n))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::column_not_found(missing))
        }
    }

    /// Projects the table onto the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table, ConfigError> {
        self.require_columns(names)?;
        let columns = names
            .iter()
            .map(|n| self.column(n).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Table::new(columns)
    }

    /// Returns the rows at `rows`, in the given order.
    ///
    /// Panics if a row index is out of bounds.
    pub fn take(&self, rows: &[usize]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            rows: rows.len(),
        }
    }

    /// Partitions rows by the values of the named columns.
    ///
    /// Groups are listed in order of first appearance and keep the original
    /// row order, so row `i` of a group is `group.rows[i]` in the table.
    /// With no key columns the whole table forms a single group.
    pub fn group_by(&self, names: &[&str]) -> Result<Vec<Group>, ConfigError> {
        self.require_columns(names)?;

        if names.is_empty() {
            return Ok(vec![Group {
                key: Vec::new(),
                rows: (0..self.rows).collect(),
            }]);
        }

        let key_columns = names
            .iter()
            .map(|n| self.column(n))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index: HashMap<Vec<Value>, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        let keyed =
            (0..self.rows).filter_map(|row| row_key(&key_columns, row).map(|key| (row, key)));
        for (row, key) in keyed {
            match index.get(&key) {
                Some(&g) => groups[g].rows.push(row),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        key,
                        rows: vec![row],
                    });
                }
            }
        }

        Ok(groups)
    }
}

/// Returns the values of row `row` across `columns`, or `None` if any column
/// is shorter than that.
pub fn row_key(columns: &[&Column], row: usize) -> Option<Vec<Value>> {
    columns.iter().map(|c| c.get(row).cloned()).collect()
}
