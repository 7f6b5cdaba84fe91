//! Error types for integrity checks.
//!
//! Every check returns `Result<(), CheckError>`. The two variants are kept
//! apart so callers can treat a [`ConfigError`] as a programming bug and a
//! [`ValidationError`] as a data-quality finding.

use crate::report::{Violations, render};
use crate::value::DataType;
use std::fmt;
use thiserror::Error;

/// Result type for check operations.
pub type Result<T = ()> = std::result::Result<T, CheckError>;

/// Error returned by every check.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The check was called incorrectly
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The data does not satisfy the declared invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CheckError {
    /// Returns true if this is a caller-misuse error.
    pub fn is_config(&self) -> bool {
        matches!(self, CheckError::Config(_))
    }

    /// Returns true if this is a data-validity failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckError::Validation(_))
    }

    /// Returns the configuration error, if any.
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            CheckError::Config(e) => Some(e),
            CheckError::Validation(_) => None,
        }
    }

    /// Returns the validation error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CheckError::Validation(e) => Some(e),
            CheckError::Config(_) => None,
        }
    }
}

/// Caller misuse: bad column names, mis-shaped arguments or predicate results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// One or more referenced columns do not exist
    #[error("Column(s) not found: {}", .columns.join(", "))]
    ColumnNotFound {
        /// Missing column names
        columns: Vec<String>,
    },

    /// A suite names a table the catalog does not hold
    #[error("Table '{0}' not found in catalog")]
    TableNotFound(String),

    /// A key list was empty
    #[error("Key column list must not be empty")]
    EmptyKey,

    /// Two argument lists do not align
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Which argument is mis-sized
        what: String,
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// The declared column set differs from the table's
    #[error(
        "Declared columns do not match table columns (missing: [{}], extra: [{}])",
        .missing.join(", "),
        .extra.join(", ")
    )]
    ColumnSetMismatch {
        /// Table columns with no declaration
        missing: Vec<String>,
        /// Declared columns absent from the table
        extra: Vec<String>,
    },

    /// A column name appears twice
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Columns of one table have different lengths
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A column mixes values of different kinds
    #[error("Column '{column}' mixes {first} and {second} values")]
    MixedColumnTypes {
        column: String,
        first: DataType,
        second: DataType,
    },

    /// The predicate returned an error
    #[error("Predicate evaluation failed: {0}")]
    PredicateFailed(String),

    /// The predicate returned something other than booleans
    #[error("Predicate must return a boolean column, got {0}")]
    PredicateNotBoolean(DataType),

    /// The predicate returned the wrong number of values
    #[error("Predicate returned {actual} values for {expected} rows{}", group_suffix(.group))]
    PredicateShape {
        /// Group key, rendered, when evaluated per group
        group: Option<String>,
        expected: usize,
        actual: usize,
    },

    /// The relation transform returned an error
    #[error("Transform failed: {0}")]
    TransformFailed(String),

    /// A range column is not numeric or date typed
    #[error("Range column '{column}' must be numeric or date typed, found {found}")]
    NonNumericRange { column: String, found: DataType },

    /// Start and end columns cannot be compared with each other
    #[error("Range columns '{start}' ({start_type}) and '{end}' ({end_type}) are not comparable")]
    IncompatibleRange {
        start: String,
        start_type: DataType,
        end: String,
        end_type: DataType,
    },

    /// A range column contains missing values
    #[error("Range column '{0}' contains missing values")]
    MissingRangeValues(String),

    /// Ranges are not in non-decreasing order
    #[error("Ranges not sorted{}", group_suffix(.group))]
    UnsortedRanges {
        /// Group key, rendered, when the check is grouped
        group: Option<String>,
    },

    /// A spacing value cannot be added to an end value
    #[error("Spacing {spacing} cannot be added to {end}")]
    InvalidSpacing { end: String, spacing: String },
}

fn group_suffix(group: &Option<String>) -> String {
    match group {
        Some(g) => format!(" in group ({g})"),
        None => String::new(),
    }
}

impl ConfigError {
    /// Creates a column-not-found error.
    pub fn column_not_found<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ColumnNotFound {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a length-mismatch error.
    pub fn length_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

/// The data violates a declared invariant.
///
/// Carries every violation found. `Display` renders the headline followed by
/// the itemized report.
#[derive(Debug, Clone)]
pub struct ValidationError {
    check: String,
    message: String,
    violations: Option<Violations>,
}

impl ValidationError {
    /// Creates a validation error with an itemized report.
    pub fn new(check: impl Into<String>, message: impl Into<String>, violations: Violations) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            violations: Some(violations),
        }
    }

    /// Creates a validation error without itemized detail.
    pub fn summary(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            violations: None,
        }
    }

    /// Name of the check that failed.
    pub fn check(&self) -> &str {
        &self.check
    }

    /// Headline message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured violations, if the check itemizes them.
    pub fn violations(&self) -> Option<&Violations> {
        self.violations.as_ref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(violations) = &self.violations {
            write!(f, "\n{}", render(violations))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
