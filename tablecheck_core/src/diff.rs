//! Set helpers for validating argument shapes.

use crate::error::ConfigError;
use std::collections::HashSet;

/// Difference of two name lists in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymmetricDiff {
    /// Present in `expected` but not in `actual`
    pub missing: Vec<String>,
    /// Present in `actual` but not in `expected`
    pub extra: Vec<String>,
}

impl SymmetricDiff {
    /// Returns true if both sides name the same set.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Compares two name lists as sets, keeping each side's original order.
pub fn symmetric_diff(expected: &[&str], actual: &[&str]) -> SymmetricDiff {
    let expected_set: HashSet<&str> = expected.iter().copied().collect();
    let actual_set: HashSet<&str> = actual.iter().copied().collect();

    SymmetricDiff {
        missing: expected
            .iter()
            .filter(|n| !actual_set.contains(*n))
            .map(|n| n.to_string())
            .collect(),
        extra: actual
            .iter()
            .filter(|n| !expected_set.contains(*n))
            .map(|n| n.to_string())
            .collect(),
    }
}

/// Returns the first name that appears more than once.
pub fn first_duplicate<'a>(names: &[&'a str]) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.iter().copied().find(|n| !seen.insert(*n))
}

/// Expands per-item options to `len` entries.
///
/// A single option is repeated; otherwise there must be exactly one per item.
pub fn broadcast<T: Clone>(what: &str, options: &[T], len: usize) -> Result<Vec<T>, ConfigError> {
    match options {
        [single] => Ok(vec![single.clone(); len]),
        _ if options.len() == len => Ok(options.to_vec()),
        _ => Err(ConfigError::length_mismatch(what, len, options.len())),
    }
}
