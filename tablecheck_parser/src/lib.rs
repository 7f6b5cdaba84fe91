//! Parser for tablecheck suites (YAML/TOML formats).
//!
//! Suites are deserialized into [`Suite`] and then checked for declarations
//! no run could ever satisfy: empty key lists, misaligned option lists,
//! repeated column declarations and check names that would collide in the
//! report. Table and column names are only resolved when the suite runs.
//!
//! # Example
//!
//! ```rust
//! use tablecheck_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: orders
//! checks:
//!   - check: primary_key
//!     table: orders
//!     columns: [order_id]
//!   - check: foreign_key
//!     table: orders
//!     reference: customers
//!     keys: [customer_id]
//!     ref_keys: [id]
//! "#;
//!
//! let suite = parse_yaml(yaml).expect("Failed to parse suite");
//! assert_eq!(suite.checks.len(), 2);
//! ```

use std::path::{Path, PathBuf};
use tablecheck_core::Suite;
use thiserror::Error;

mod validate;

pub use validate::validate_suite;

/// Errors that can occur while loading a suite.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML suite: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML suite: {0}")]
    Toml(#[from] toml::de::Error),

    /// The suite file could not be read
    #[error("Failed to read suite file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a suite format
    #[error("Cannot tell suite format of {} (expected .yaml, .yml or .toml)", .0.display())]
    UnknownFormat(PathBuf),

    /// The suite parsed but declares a check that cannot run
    #[error("Invalid check '{check}': {reason}")]
    InvalidSuite {
        /// Label of the offending check, or the suite name
        check: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ParserError {
    /// Creates an invalid-suite error.
    pub fn invalid(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSuite {
            check: check.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported suite file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

impl SuiteFormat {
    /// Picks the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(SuiteFormat::Yaml),
            "toml" => Some(SuiteFormat::Toml),
            _ => None,
        }
    }
}

/// Parses and validates a suite written in `format`.
pub fn parse_str(content: &str, format: SuiteFormat) -> Result<Suite> {
    let suite: Suite = match format {
        SuiteFormat::Yaml => serde_yaml_ng::from_str(content)?,
        SuiteFormat::Toml => toml::from_str(content)?,
    };
    validate_suite(&suite)?;
    Ok(suite)
}

/// Parses and validates a YAML suite.
pub fn parse_yaml(content: &str) -> Result<Suite> {
    parse_str(content, SuiteFormat::Yaml)
}

/// Parses and validates a TOML suite.
///
/// # Example
///
/// ```rust
/// use tablecheck_parser::parse_toml;
///
/// let toml = r#"
/// name = "periods"
///
/// [[checks]]
/// check = "range_contiguous"
/// table = "contracts"
/// start = "valid_from"
/// end = "valid_to"
/// spacing = 1
/// by = ["contract_id"]
/// "#;
///
/// let suite = parse_toml(toml).unwrap();
/// assert_eq!(suite.checks[0].kind(), "range_contiguous");
/// ```
pub fn parse_toml(content: &str) -> Result<Suite> {
    parse_str(content, SuiteFormat::Toml)
}

/// Detects the suite format of `path` from its extension.
pub fn detect_format(path: &Path) -> Result<SuiteFormat> {
    SuiteFormat::from_path(path).ok_or_else(|| ParserError::UnknownFormat(path.to_path_buf()))
}

/// Loads a suite file, detecting its format from the extension.
///
/// ```no_run
/// use tablecheck_parser::parse_file;
/// use std::path::Path;
///
/// let suite = parse_file(Path::new("checks/orders.yml")).unwrap();
/// println!("Loaded suite: {}", suite.name);
/// ```
pub fn parse_file(path: &Path) -> Result<Suite> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ParserError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&content, format)
}
