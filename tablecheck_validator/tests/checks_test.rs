//! Behavioural properties shared by every check.
//!
//! Each check is a pure function of its inputs: re-running it gives the same
//! outcome, and taking a passing table and breaking exactly one row or value
//! must make it fail with that row or value in the report.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tablecheck_core::{
    CheckError, Column, Spacing, Table, TableBuilder, TypeHierarchy, Value, Violations,
};
use tablecheck_validator::{
    check_column_relation, check_column_types, check_foreign_keys,
    check_no_required_values_missing, check_primary_key_unique, check_range_contiguous,
    check_table_constraint,
};

fn violations(err: &CheckError) -> &Violations {
    err.as_validation()
        .and_then(|e| e.violations())
        .expect("validation error with violations")
}

fn positive(t: &Table) -> anyhow::Result<Column> {
    Ok(t.column("x")?.test(|v| v.as_int().is_some_and(|x| x > 0)))
}

#[test]
fn test_documented_examples() {
    let people = TableBuilder::new()
        .column("a", [Some(1), None])
        .column("b", [1, 2])
        .build()
        .unwrap();
    let err = check_no_required_values_missing(&people, &[]).unwrap_err();
    assert_eq!(violations(&err).get("a"), Some(&["1".to_string()][..]));
    assert!(check_no_required_values_missing(&people, &["a"]).is_ok());

    let xs = TableBuilder::new().column("x", [1, -1, 2]).build().unwrap();
    let err = check_table_constraint(&xs, positive, None).unwrap_err();
    match violations(&err) {
        Violations::Rows { table, row_ids } => {
            assert_eq!(row_ids.as_deref(), Some(&[1][..]));
            assert_eq!(table.column("x").unwrap().values(), &[Value::Int(-1)]);
        }
        other => panic!("unexpected violations: {other:?}"),
    }

    let ranges = TableBuilder::new()
        .column("s", [0, 1, 2])
        .column("e", [1, 2, 3])
        .build()
        .unwrap();
    assert!(check_range_contiguous(&ranges, "s", "e", &Spacing::zero(), None).is_ok());

    let numbers = TableBuilder::new().column("x", [1.0, 2.0]).build().unwrap();
    let words = TableBuilder::new().column("x", ["one", "two"]).build().unwrap();
    let hierarchy = TypeHierarchy::default();
    assert!(check_column_types(&numbers, &[("x", "numeric")], &[false], &hierarchy).is_ok());
    assert!(check_column_types(&numbers, &[("x", "numeric")], &[true], &hierarchy).is_ok());
    let err = check_column_types(&words, &[("x", "numeric")], &[false], &hierarchy).unwrap_err();
    assert_eq!(
        violations(&err).get("x"),
        Some(&["expected numeric, found string".to_string()][..])
    );
}

#[test]
fn test_primary_key_reports_distinct_duplicates() {
    let table = TableBuilder::new()
        .column("a", [1, 1, 1, 2, 2, 3])
        .column("b", ["x", "x", "x", "y", "y", "z"])
        .build()
        .unwrap();

    let err = check_primary_key_unique(&table, &["a", "b"]).unwrap_err();
    match violations(&err) {
        Violations::Rows { table, row_ids } => {
            assert_eq!(row_ids, &None);
            assert_eq!(table.num_rows(), 2);
            assert_eq!(
                table.column("a").unwrap().values(),
                &[Value::Int(1), Value::Int(2)]
            );
        }
        other => panic!("unexpected violations: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Primary key [a, b] is not unique; duplicated values:\n  a  b\n  1  x\n  2  y"
    );
}

#[test]
fn test_single_point_perturbations_are_caught() {
    // primary key: duplicate one id
    let ids = TableBuilder::new().column("id", [1, 2, 3]).build().unwrap();
    assert!(check_primary_key_unique(&ids, &["id"]).is_ok());
    let ids = TableBuilder::new().column("id", [1, 2, 2]).build().unwrap();
    assert!(check_primary_key_unique(&ids, &["id"]).is_err());

    // foreign key: one unknown reference
    let parent = TableBuilder::new().column("id", [1, 2]).build().unwrap();
    let child = TableBuilder::new().column("id", [2, 1, 2]).build().unwrap();
    assert!(check_foreign_keys(&child, &parent, &["id"], None, &[false]).is_ok());
    let child = TableBuilder::new().column("id", [2, 5, 2]).build().unwrap();
    let err = check_foreign_keys(&child, &parent, &["id"], None, &[false]).unwrap_err();
    assert_eq!(violations(&err).get("id"), Some(&["5".to_string()][..]));

    // required: one value removed
    let full = TableBuilder::new().column("v", [1, 2, 3]).build().unwrap();
    assert!(check_no_required_values_missing(&full, &[]).is_ok());
    let holed = TableBuilder::new()
        .column("v", [Some(1), Some(2), None])
        .build()
        .unwrap();
    let err = check_no_required_values_missing(&holed, &[]).unwrap_err();
    assert_eq!(violations(&err).get("v"), Some(&["2".to_string()][..]));

    // constraint: one row flipped negative
    let good = TableBuilder::new().column("x", [4, 5, 6]).build().unwrap();
    assert!(check_table_constraint(&good, positive, None).is_ok());
    let bad = TableBuilder::new().column("x", [4, -5, 6]).build().unwrap();
    let err = check_table_constraint(&bad, positive, None).unwrap_err();
    assert!(matches!(
        violations(&err),
        Violations::Rows { row_ids: Some(ids), .. } if ids == &vec![1]
    ));

    // range: one start shifted
    let tiles = TableBuilder::new()
        .column("s", [0, 5, 10])
        .column("e", [5, 10, 15])
        .build()
        .unwrap();
    assert!(check_range_contiguous(&tiles, "s", "e", &Spacing::zero(), None).is_ok());
    let shifted = TableBuilder::new()
        .column("s", [0, 6, 10])
        .column("e", [5, 10, 15])
        .build()
        .unwrap();
    let err = check_range_contiguous(&shifted, "s", "e", &Spacing::zero(), None).unwrap_err();
    assert_eq!(violations(&err), &Violations::Values(vec!["5 -> 6".to_string()]));

    // relation: one value changed
    let left = TableBuilder::new().column("x", [1, 2, 3]).build().unwrap();
    let right = TableBuilder::new().column("x", [1, 2, 4]).build().unwrap();
    let identity = |c: &Column| -> anyhow::Result<Column> { Ok(c.clone()) };
    assert!(check_column_relation(&left, &left, "x", "x", identity, None).is_ok());
    assert!(check_column_relation(&left, &right, "x", "x", identity, None).is_err());
}

#[test]
fn test_checks_are_idempotent() {
    let table = TableBuilder::new()
        .column("id", [Some(1), Some(1), None])
        .column("x", [Some(3), Some(-2), None])
        .build()
        .unwrap();

    let runs: Vec<String> = (0..2)
        .map(|_| {
            [
                check_primary_key_unique(&table, &["id"]),
                check_no_required_values_missing(&table, &[]),
                check_table_constraint(&table, positive, Some(&["id"])),
            ]
            .into_iter()
            .map(|r| r.map_or_else(|e| e.to_string(), |()| "ok".to_string()))
            .collect::<Vec<_>>()
            .join("\n---\n")
        })
        .collect();

    assert_eq!(runs[0], runs[1]);
}

#[test]
fn test_inputs_are_not_reordered() {
    let table = TableBuilder::new()
        .column("g", ["b", "a", "b"])
        .column("x", [1, 2, 3])
        .build()
        .unwrap();
    let before = table.clone();

    let _ = check_table_constraint(&table, positive, Some(&["g"]));
    let _ = check_primary_key_unique(&table, &["g"]);

    assert_eq!(table, before);
}

#[test]
fn test_grouped_date_ranges() {
    let day = |m: u32, d: u32| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
    let contracts = TableBuilder::new()
        .column("contract", ["c1", "c1", "c2", "c2"])
        .column("valid_from", [day(1, 1), day(2, 1), day(1, 1), day(3, 1)])
        .column("valid_to", [day(1, 31), day(2, 29), day(2, 29), day(3, 31)])
        .build()
        .unwrap();

    let spacing = Spacing::Uniform(Value::Int(1));
    assert!(
        check_range_contiguous(
            &contracts,
            "valid_from",
            "valid_to",
            &spacing,
            Some(&["contract"])
        )
        .is_ok()
    );

    // Without grouping the rows are not in start order.
    let err =
        check_range_contiguous(&contracts, "valid_from", "valid_to", &spacing, None).unwrap_err();
    assert!(err.is_config());
}
