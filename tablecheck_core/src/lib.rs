//! # tablecheck core
//!
//! Core data structures for the tablecheck integrity checks.
//!
//! This crate provides the in-memory tabular model the checks run against,
//! the two error kinds every check reports through, and the machinery that
//! renders violations into a single readable message.
//!
//! ## Key Concepts
//!
//! - **Table**: ordered, equally long, uniquely named columns of [`Value`]s
//! - **Group**: rows sharing the same values on a list of key columns
//! - **Violations**: everything a check found wrong, as values, keyed values
//!   or a row-set
//! - **CheckError**: either a [`ConfigError`] (the check was misused) or a
//!   [`ValidationError`] (the data is wrong)
//!
//! ## Example
//!
//! ```rust
//! use tablecheck_core::{TableBuilder, Value};
//!
//! let table = TableBuilder::new()
//!     .column("id", [1, 2, 2])
//!     .column("region", ["eu", "us", "us"])
//!     .build()
//!     .unwrap();
//!
//! let groups = table.group_by(&["region"]).unwrap();
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[1].key, vec![Value::from("us")]);
//! assert_eq!(groups[1].rows, vec![1, 2]);
//! ```

pub mod builder;
pub mod diff;
pub mod error;
pub mod report;
pub mod suite;
pub mod table;
pub mod types;
pub mod validator;
pub mod value;

pub use builder::*;
pub use diff::*;
pub use error::*;
pub use report::*;
pub use suite::*;
pub use table::*;
pub use types::*;
pub use validator::*;
pub use value::*;
