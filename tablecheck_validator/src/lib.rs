//! # tablecheck validator
//!
//! Integrity checks for in-memory tables. Each check inspects a table (or a
//! pair of tables) and either succeeds or fails with every violation found:
//!
//! - Primary key uniqueness
//! - Foreign key referential integrity
//! - Required-value presence
//! - Column type conformance, strict or through a type hierarchy
//! - Row and group predicates
//! - Interval contiguity
//! - Functional relations between columns of two tables
//!
//! Checks return `Result<(), CheckError>`. A [`ConfigError`] means the check
//! was called incorrectly; a [`ValidationError`] means the data is wrong and
//! carries the full report.
//!
//! [`ConfigError`]: tablecheck_core::ConfigError
//! [`ValidationError`]: tablecheck_core::ValidationError
//!
//! ## Example
//!
//! ```rust
//! use tablecheck_core::TableBuilder;
//! use tablecheck_validator::{check_no_required_values_missing, check_primary_key_unique};
//!
//! let table = TableBuilder::new()
//!     .column("id", [1, 2, 2])
//!     .column("email", [Some("a@x"), None, Some("c@x")])
//!     .build()
//!     .unwrap();
//!
//! let err = check_primary_key_unique(&table, &["id"]).unwrap_err();
//! assert!(err.is_validation());
//! println!("{err}");
//!
//! assert!(check_no_required_values_missing(&table, &["email"]).is_ok());
//! ```

mod column_types;
mod constraint;
mod engine;
mod foreign_key;
mod primary_key;
mod range;
mod relation;
mod required;

pub use column_types::*;
pub use constraint::*;
pub use engine::*;
pub use foreign_key::*;
pub use primary_key::*;
pub use range::*;
pub use relation::*;
pub use required::*;
