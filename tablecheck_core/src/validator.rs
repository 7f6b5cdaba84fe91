//! Run options and reports for check suites.

use crate::TypeHierarchy;
use serde::Serialize;
use std::collections::HashMap;

/// Options for running a suite.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Stop after the first check that does not pass
    pub fail_fast: bool,

    /// Subtype relation used by column type checks
    pub hierarchy: TypeHierarchy,

    /// Additional metadata copied into the report
    pub metadata: HashMap<String, String>,
}

impl RunContext {
    /// Creates a new run context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets fail-fast mode.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Sets the type hierarchy.
    pub fn with_hierarchy(mut self, hierarchy: TypeHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Adds metadata to the context.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// The data satisfies the check
    Passed,
    /// The data violates the check
    Failed,
    /// The check could not run as declared
    Misconfigured,
}

/// Result of one check within a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Check label
    pub name: String,

    /// Outcome
    pub status: CheckStatus,

    /// Rendered failure message, absent when the check passed
    pub message: Option<String>,
}

impl CheckOutcome {
    /// Creates a passing outcome.
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Passed,
            message: None,
        }
    }

    /// Creates a non-passing outcome.
    pub fn failed(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: Some(message.into()),
        }
    }
}

/// Statistics about a suite run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Number of checks executed
    pub checks_run: usize,

    /// Number of checks skipped by fail-fast
    pub checks_skipped: usize,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}

/// Report of a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Suite name
    pub suite: String,

    /// Whether every executed check passed
    pub passed: bool,

    /// Per-check outcomes, in execution order
    pub outcomes: Vec<CheckOutcome>,

    /// Run statistics
    pub stats: RunStats,

    /// Metadata from the run context
    pub metadata: HashMap<String, String>,
}

impl SuiteReport {
    /// Creates an empty, passing report.
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            passed: true,
            outcomes: Vec::new(),
            stats: RunStats::default(),
            metadata: HashMap::new(),
        }
    }

    /// Records an outcome.
    pub fn add_outcome(&mut self, outcome: CheckOutcome) {
        if outcome.status != CheckStatus::Passed {
            self.passed = false;
        }
        self.stats.checks_run += 1;
        self.outcomes.push(outcome);
    }

    /// Outcomes that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status != CheckStatus::Passed)
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
