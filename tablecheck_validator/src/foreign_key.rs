//! Foreign key referential integrity.

use std::collections::HashSet;
use tablecheck_core::{
    CheckError, ConfigError, Table, Value, Violations, broadcast, ensure_none,
};
use tracing::{debug, instrument};

/// Verifies that every value of the child key columns exists in the
/// corresponding parent columns.
///
/// `ref_keys` defaults to `keys` and pairs with it positionally. `optional`
/// holds one flag per key, or a single flag applied to all of them; an
/// optional key tolerates missing values in the child. Without the flag a
/// missing child value only matches a missing parent value.
///
/// The report lists, per child column, the distinct unmatched values in order
/// of first appearance. Keys where everything matched are left out.
///
/// Numbers match across kinds: an integer child key finds `1.0` in a float
/// parent column.
///
/// # Example
///
/// ```rust
/// use tablecheck_core::TableBuilder;
/// use tablecheck_validator::check_foreign_keys;
///
/// let customers = TableBuilder::new().column("id", [1, 2]).build().unwrap();
/// let orders = TableBuilder::new()
///     .column("customer_id", [Some(1), None, Some(2)])
///     .build()
///     .unwrap();
///
/// assert!(check_foreign_keys(&orders, &customers, &["customer_id"], Some(&["id"]), &[true]).is_ok());
/// assert!(check_foreign_keys(&orders, &customers, &["customer_id"], Some(&["id"]), &[false]).is_err());
/// ```
#[instrument(
    level = "debug",
    skip(child, parent),
    fields(child_rows = child.num_rows(), parent_rows = parent.num_rows())
)]
pub fn check_foreign_keys(
    child: &Table,
    parent: &Table,
    keys: &[&str],
    ref_keys: Option<&[&str]>,
    optional: &[bool],
) -> Result<(), CheckError> {
    if keys.is_empty() {
        return Err(ConfigError::EmptyKey.into());
    }
    let ref_keys = ref_keys.unwrap_or(keys);
    if ref_keys.len() != keys.len() {
        return Err(ConfigError::length_mismatch("reference keys", keys.len(), ref_keys.len()).into());
    }
    let optional = broadcast("optional flags", optional, keys.len())?;

    child.require_columns(keys)?;
    parent.require_columns(ref_keys)?;

    let mut unmatched = Vec::with_capacity(keys.len());

    for ((key, ref_key), is_optional) in keys.iter().zip(ref_keys).zip(optional) {
        let mut allowed: HashSet<Value> = parent
            .column(ref_key)?
            .values()
            .iter()
            .map(Value::numeric_key)
            .collect();
        if is_optional {
            allowed.insert(Value::Null);
        }

        let mut reported = HashSet::new();
        let missing: Vec<String> = child
            .column(key)?
            .values()
            .iter()
            .filter(|v| {
                let lookup = v.numeric_key();
                !allowed.contains(&lookup) && reported.insert(lookup)
            })
            .map(ToString::to_string)
            .collect();

        debug!(key, ref_key, unmatched = missing.len(), "foreign key scanned");
        unmatched.push((key.to_string(), missing));
    }

    ensure_none(
        "foreign_key",
        "Foreign key values not found in reference table:",
        Violations::keyed(unmatched),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tablecheck_core::TableBuilder;

    fn parent() -> Table {
        TableBuilder::new()
            .column("id", [1, 2, 3])
            .column("region", ["eu", "us", "eu"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_all_matched_passes() {
        let child = TableBuilder::new()
            .column("id", [1, 1, 3])
            .column("region", ["us", "eu", "eu"])
            .build()
            .unwrap();
        assert!(check_foreign_keys(&child, &parent(), &["id", "region"], None, &[false]).is_ok());
    }

    #[test]
    fn test_unmatched_values_reported_per_key() {
        let child = TableBuilder::new()
            .column("customer", [1, 7, 7, 8])
            .column("region", ["eu", "eu", "eu", "eu"])
            .build()
            .unwrap();

        let err = check_foreign_keys(
            &child,
            &parent(),
            &["customer", "region"],
            Some(&["id", "region"]),
            &[false],
        )
        .unwrap_err();

        let validation = err.as_validation().unwrap();
        let violations = validation.violations().unwrap();
        assert_eq!(
            violations,
            &Violations::Keyed(vec![(
                "customer".to_string(),
                vec!["7".to_string(), "8".to_string()]
            )])
        );
        assert_eq!(
            err.to_string(),
            "Foreign key values not found in reference table:\n  customer: 7, 8"
        );
    }

    #[test]
    fn test_optional_per_key() {
        let child = TableBuilder::new()
            .column("id", [Some(1), None])
            .column("region", [Some("eu"), None])
            .build()
            .unwrap();

        let err = check_foreign_keys(&child, &parent(), &["id", "region"], None, &[true, false])
            .unwrap_err();
        let violations = err.as_validation().unwrap().violations().unwrap();
        assert_eq!(violations.get("id"), None);
        assert_eq!(violations.get("region"), Some(&["NA".to_string()][..]));
    }

    #[test]
    fn test_missing_matches_missing_parent() {
        let parent = TableBuilder::new().column("id", [Some(1), None]).build().unwrap();
        let child = TableBuilder::new().column("id", [None, Some(1)]).build().unwrap();
        assert!(check_foreign_keys(&child, &parent, &["id"], None, &[false]).is_ok());
    }

    #[test]
    fn test_integer_keys_match_float_parent() {
        let parent = TableBuilder::new().column("id", [1.0, 2.0]).build().unwrap();
        let child = TableBuilder::new().column("id", [1, 2]).build().unwrap();
        assert!(check_foreign_keys(&child, &parent, &["id"], None, &[false]).is_ok());

        let child = TableBuilder::new().column("id", [2, 3, 3]).build().unwrap();
        let err = check_foreign_keys(&child, &parent, &["id"], None, &[false]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Foreign key values not found in reference table:\n  id: 3"
        );
    }

    #[test]
    fn test_fractional_float_keys_still_compare_exactly() {
        let parent = TableBuilder::new().column("id", [1, 2]).build().unwrap();
        let child = TableBuilder::new().column("id", [2.0, 1.5]).build().unwrap();
        let err = check_foreign_keys(&child, &parent, &["id"], None, &[false]).unwrap_err();
        let violations = err.as_validation().unwrap().violations().unwrap();
        assert_eq!(violations.get("id"), Some(&["1.5".to_string()][..]));
    }

    #[test]
    fn test_config_errors() {
        let child = TableBuilder::new().column("id", [1]).build().unwrap();

        let err = check_foreign_keys(&child, &parent(), &["id"], Some(&["id", "region"]), &[false])
            .unwrap_err();
        assert!(matches!(err.as_config(), Some(ConfigError::LengthMismatch { .. })));

        let err = check_foreign_keys(&child, &parent(), &["id"], None, &[true, false]).unwrap_err();
        assert!(matches!(err.as_config(), Some(ConfigError::LengthMismatch { .. })));

        let err = check_foreign_keys(&child, &parent(), &["id"], Some(&["nope"]), &[false])
            .unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::column_not_found(["nope"])));

        let err = check_foreign_keys(&child, &parent(), &[], None, &[false]).unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::EmptyKey));
    }
}
