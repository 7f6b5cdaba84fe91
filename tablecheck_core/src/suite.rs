//! Declarative check suites.
//!
//! A [`Suite`] lists checks against named tables so a set of integrity rules
//! can be kept in a YAML or TOML file next to the data it guards. Only checks
//! whose arguments are plain data can be declared this way; predicate and
//! relation checks take closures and are registered in code on the runner.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A named collection of checks.
///
/// # Example
///
/// ```rust
/// use tablecheck_core::{CheckSpec, Suite};
///
/// let suite = Suite {
///     name: "orders".to_string(),
///     description: None,
///     checks: vec![CheckSpec::PrimaryKey {
///         name: None,
///         table: "orders".to_string(),
///         columns: vec!["order_id".to_string()],
///     }],
/// };
/// assert_eq!(suite.checks[0].label(), "primary_key(orders)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name, used in reports
    pub name: String,

    /// Optional human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Checks to run, in order
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

/// One declared check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckSpec {
    /// Key columns must be unique
    PrimaryKey {
        #[serde(default)]
        name: Option<String>,
        table: String,
        columns: Vec<String>,
    },

    /// Child key values must exist in the reference table
    ForeignKey {
        #[serde(default)]
        name: Option<String>,
        table: String,
        reference: String,
        keys: Vec<String>,
        #[serde(default)]
        ref_keys: Option<Vec<String>>,
        #[serde(default = "default_optional")]
        optional: Vec<bool>,
    },

    /// No missing values outside the optional columns
    Required {
        #[serde(default)]
        name: Option<String>,
        table: String,
        #[serde(default)]
        optional: Vec<String>,
    },

    /// Every column has the declared type
    ColumnTypes {
        #[serde(default)]
        name: Option<String>,
        table: String,
        types: Vec<ColumnTypeSpec>,
    },

    /// Start/end intervals tile without gaps or overlaps
    RangeContiguous {
        #[serde(default)]
        name: Option<String>,
        table: String,
        start: String,
        end: String,
        #[serde(default)]
        spacing: NumberSpec,
        #[serde(default)]
        by: Option<Vec<String>>,
    },
}

fn default_optional() -> Vec<bool> {
    vec![false]
}

impl CheckSpec {
    /// Returns the kind of check as written in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckSpec::PrimaryKey { .. } => "primary_key",
            CheckSpec::ForeignKey { .. } => "foreign_key",
            CheckSpec::Required { .. } => "required",
            CheckSpec::ColumnTypes { .. } => "column_types",
            CheckSpec::RangeContiguous { .. } => "range_contiguous",
        }
    }

    /// Returns the table the check inspects.
    pub fn table(&self) -> &str {
        match self {
            CheckSpec::PrimaryKey { table, .. }
            | CheckSpec::ForeignKey { table, .. }
            | CheckSpec::Required { table, .. }
            | CheckSpec::ColumnTypes { table, .. }
            | CheckSpec::RangeContiguous { table, .. } => table,
        }
    }

    /// Returns the explicit name, or `kind(table)`.
    pub fn label(&self) -> String {
        let name = match self {
            CheckSpec::PrimaryKey { name, .. }
            | CheckSpec::ForeignKey { name, .. }
            | CheckSpec::Required { name, .. }
            | CheckSpec::ColumnTypes { name, .. }
            | CheckSpec::RangeContiguous { name, .. } => name,
        };
        name.clone()
            .unwrap_or_else(|| format!("{}({})", self.kind(), self.table()))
    }
}

/// Expected type of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTypeSpec {
    /// Column name
    pub column: String,

    /// Expected type tag
    #[serde(rename = "type")]
    pub type_tag: String,

    /// Accept any tag descending from the expected one
    #[serde(default)]
    pub inherit: bool,
}

/// A number as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberSpec {
    Int(i64),
    Float(f64),
}

impl Default for NumberSpec {
    fn default() -> Self {
        NumberSpec::Int(0)
    }
}

impl From<NumberSpec> for Value {
    fn from(n: NumberSpec) -> Self {
        match n {
            NumberSpec::Int(i) => Value::Int(i),
            NumberSpec::Float(f) => Value::Float(f),
        }
    }
}

/// Required distance between one interval's end and the next one's start.
#[derive(Debug, Clone, PartialEq)]
pub enum Spacing {
    /// The same spacing for every transition
    Uniform(Value),
    /// One spacing per row; row `i` governs its transition to the next row
    PerRow(Vec<Value>),
}

impl Spacing {
    /// Spacing of zero: each interval starts exactly where the previous ended.
    pub fn zero() -> Self {
        Spacing::Uniform(Value::Int(0))
    }
}

impl From<NumberSpec> for Spacing {
    fn from(n: NumberSpec) -> Self {
        Spacing::Uniform(n.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let spec = CheckSpec::Required {
            name: Some("no gaps".to_string()),
            table: "t".to_string(),
            optional: vec![],
        };
        assert_eq!(spec.label(), "no gaps");
        assert_eq!(spec.kind(), "required");
        assert_eq!(spec.table(), "t");
    }

    #[test]
    fn test_number_spec_into_spacing() {
        assert_eq!(Spacing::from(NumberSpec::Int(1)), Spacing::Uniform(Value::Int(1)));
        assert_eq!(NumberSpec::default(), NumberSpec::Int(0));
    }
}
