//! Suite runner.
//!
//! Runs every check of a [`Suite`] against a catalog of named tables and
//! collects the outcomes into a [`SuiteReport`]. Checks that take closures
//! cannot be declared in a suite file; they are registered on the runner and
//! run after the declared ones.

use crate::{
    check_column_relation, check_column_types, check_foreign_keys,
    check_no_required_values_missing, check_primary_key_unique, check_range_contiguous,
    check_table_constraint,
};
use std::collections::HashMap;
use std::time::Instant;
use tablecheck_core::{
    CheckError, CheckOutcome, CheckSpec, CheckStatus, Column, ConfigError, RunContext, Spacing,
    Suite, SuiteReport, Table,
};
use tracing::{debug, info, warn};

type Predicate = Box<dyn Fn(&Table) -> anyhow::Result<Column>>;
type Transform = Box<dyn Fn(&Column) -> anyhow::Result<Column>>;

struct ConstraintCheck {
    name: String,
    table: String,
    by: Option<Vec<String>>,
    predicate: Predicate,
}

struct RelationCheck {
    name: String,
    table1: String,
    col1: String,
    table2: String,
    col2: String,
    by: Option<Vec<String>>,
    transform: Transform,
}

/// Runs check suites against a catalog of tables.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use tablecheck_core::{Column, RunContext, SuiteBuilder, Table, TableBuilder};
/// use tablecheck_validator::SuiteRunner;
///
/// let suite = SuiteBuilder::new("orders")
///     .primary_key("orders", &["id"])
///     .required("orders", &[])
///     .build();
///
/// let mut catalog = HashMap::new();
/// catalog.insert(
///     "orders".to_string(),
///     TableBuilder::new().column("id", [1, 2]).column("qty", [3, 0]).build().unwrap(),
/// );
///
/// let runner = SuiteRunner::new().with_constraint(
///     "positive quantity",
///     "orders",
///     None,
///     |t: &Table| -> anyhow::Result<Column> {
///         Ok(t.column("qty")?.test(|v| v.as_int().is_some_and(|q| q > 0)))
///     },
/// );
///
/// let report = runner.run(&suite, &catalog, &RunContext::new());
/// assert!(!report.passed);
/// assert_eq!(report.failures().count(), 1);
/// ```
#[derive(Default)]
pub struct SuiteRunner {
    constraints: Vec<ConstraintCheck>,
    relations: Vec<RelationCheck>,
}

impl SuiteRunner {
    /// Creates a runner with no registered closure checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predicate check on `table`, optionally grouped by `by`.
    pub fn with_constraint<F>(
        mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        by: Option<&[&str]>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&Table) -> anyhow::Result<Column> + 'static,
    {
        self.constraints.push(ConstraintCheck {
            name: name.into(),
            table: table.into(),
            by: owned_names(by),
            predicate: Box::new(predicate),
        });
        self
    }

    /// Registers a relation check: `table1.col1` must equal the transform of
    /// `table2.col2`, optionally per group of `by`.
    #[allow(clippy::too_many_arguments)]
    pub fn with_relation<F>(
        mut self,
        name: impl Into<String>,
        table1: impl Into<String>,
        col1: impl Into<String>,
        table2: impl Into<String>,
        col2: impl Into<String>,
        by: Option<&[&str]>,
        transform: F,
    ) -> Self
    where
        F: Fn(&Column) -> anyhow::Result<Column> + 'static,
    {
        self.relations.push(RelationCheck {
            name: name.into(),
            table1: table1.into(),
            col1: col1.into(),
            table2: table2.into(),
            col2: col2.into(),
            by: owned_names(by),
            transform: Box::new(transform),
        });
        self
    }

    /// Runs the declared checks of `suite`, then the registered ones.
    ///
    /// A failing check never stops the run unless `context.fail_fast` is set,
    /// in which case the remaining checks are counted as skipped.
    pub fn run(
        &self,
        suite: &Suite,
        catalog: &HashMap<String, Table>,
        context: &RunContext,
    ) -> SuiteReport {
        let start = Instant::now();
        let total = suite.checks.len() + self.constraints.len() + self.relations.len();
        info!(suite = %suite.name, checks = total, "running suite");

        let mut report = SuiteReport::new(&suite.name);
        report.metadata = context.metadata.clone();

        let declared = suite
            .checks
            .iter()
            .map(|spec| (spec.label(), run_declared(spec, catalog, context)));
        let constraints = self
            .constraints
            .iter()
            .map(|check| (check.name.clone(), check.run(catalog)));
        let relations = self
            .relations
            .iter()
            .map(|check| (check.name.clone(), check.run(catalog)));

        for (name, result) in declared.chain(constraints).chain(relations) {
            let outcome = match result {
                Ok(()) => {
                    debug!(check = %name, "check passed");
                    CheckOutcome::passed(name)
                }
                Err(err) => {
                    let status = if err.is_config() {
                        CheckStatus::Misconfigured
                    } else {
                        CheckStatus::Failed
                    };
                    warn!(check = %name, ?status, "check did not pass");
                    CheckOutcome::failed(name, status, err.to_string())
                }
            };

            let stop = context.fail_fast && outcome.status != CheckStatus::Passed;
            report.add_outcome(outcome);
            if stop {
                report.stats.checks_skipped = total - report.stats.checks_run;
                break;
            }
        }

        report.stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            suite = %suite.name,
            passed = report.passed,
            failures = report.failures().count(),
            "suite finished"
        );
        report
    }
}

impl ConstraintCheck {
    fn run(&self, catalog: &HashMap<String, Table>) -> Result<(), CheckError> {
        let table = lookup(catalog, &self.table)?;
        let by = borrowed_names(&self.by);
        check_table_constraint(table, &self.predicate, by.as_deref())
    }
}

impl RelationCheck {
    fn run(&self, catalog: &HashMap<String, Table>) -> Result<(), CheckError> {
        let table1 = lookup(catalog, &self.table1)?;
        let table2 = lookup(catalog, &self.table2)?;
        let by = borrowed_names(&self.by);
        check_column_relation(
            table1,
            table2,
            &self.col1,
            &self.col2,
            &self.transform,
            by.as_deref(),
        )
    }
}

fn run_declared(
    spec: &CheckSpec,
    catalog: &HashMap<String, Table>,
    context: &RunContext,
) -> Result<(), CheckError> {
    let table = lookup(catalog, spec.table())?;

    match spec {
        CheckSpec::PrimaryKey { columns, .. } => {
            check_primary_key_unique(table, &as_strs(columns))
        }
        CheckSpec::ForeignKey {
            reference,
            keys,
            ref_keys,
            optional,
            ..
        } => {
            let parent = lookup(catalog, reference)?;
            let ref_keys = ref_keys.as_deref().map(as_strs);
            check_foreign_keys(table, parent, &as_strs(keys), ref_keys.as_deref(), optional)
        }
        CheckSpec::Required { optional, .. } => {
            check_no_required_values_missing(table, &as_strs(optional))
        }
        CheckSpec::ColumnTypes { types, .. } => {
            let expected: Vec<(&str, &str)> = types
                .iter()
                .map(|t| (t.column.as_str(), t.type_tag.as_str()))
                .collect();
            let inherit: Vec<bool> = types.iter().map(|t| t.inherit).collect();
            check_column_types(table, &expected, &inherit, &context.hierarchy)
        }
        CheckSpec::RangeContiguous {
            start,
            end,
            spacing,
            by,
            ..
        } => {
            let by = borrowed_names(by);
            check_range_contiguous(table, start, end, &Spacing::from(*spacing), by.as_deref())
        }
    }
}

fn lookup<'a>(catalog: &'a HashMap<String, Table>, name: &str) -> Result<&'a Table, CheckError> {
    catalog
        .get(name)
        .ok_or_else(|| ConfigError::TableNotFound(name.to_string()).into())
}

fn as_strs(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

fn borrowed_names(names: &Option<Vec<String>>) -> Option<Vec<&str>> {
    names.as_deref().map(as_strs)
}

fn owned_names(names: Option<&[&str]>) -> Option<Vec<String>> {
    names.map(|n| n.iter().map(|s| s.to_string()).collect())
}
