//! Violation results and their rendering.
//!
//! Every check collects what it found into a [`Violations`] value and hands it
//! to [`ensure_none`]. An empty result is a no-op; anything else becomes a
//! single [`ValidationError`] whose message lists every violation.

use crate::error::ValidationError;
use crate::table::Table;

/// Structured record of everything a check found wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum Violations {
    /// Offending values, already rendered
    Values(Vec<String>),
    /// Offending values grouped under a label such as a column name
    Keyed(Vec<(String, Vec<String>)>),
    /// Offending rows, optionally with their original row indices
    Rows {
        table: Table,
        row_ids: Option<Vec<usize>>,
    },
}

impl Violations {
    /// Builds a keyed result, dropping labels with nothing to report.
    pub fn keyed(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        Violations::Keyed(
            entries
                .into_iter()
                .filter(|(_, items)| !items.is_empty())
                .collect(),
        )
    }

    /// Builds a row-set result.
    pub fn rows(table: Table, row_ids: Option<Vec<usize>>) -> Self {
        Violations::Rows { table, row_ids }
    }

    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        match self {
            Violations::Values(items) => items.is_empty(),
            Violations::Keyed(entries) => entries.iter().all(|(_, items)| items.is_empty()),
            Violations::Rows { table, .. } => table.is_empty(),
        }
    }

    /// Returns the number of reported items.
    pub fn len(&self) -> usize {
        match self {
            Violations::Values(items) => items.len(),
            Violations::Keyed(entries) => entries.iter().map(|(_, items)| items.len()).sum(),
            Violations::Rows { table, .. } => table.num_rows(),
        }
    }

    /// Looks up the items reported under a label.
    pub fn get(&self, label: &str) -> Option<&[String]> {
        match self {
            Violations::Keyed(entries) => entries
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, items)| items.as_slice()),
            _ => None,
        }
    }
}

/// Succeeds when `violations` is empty, otherwise fails with a rendered
/// [`ValidationError`].
pub fn ensure_none(
    check: &str,
    message: impl Into<String>,
    violations: Violations,
) -> Result<(), ValidationError> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(ValidationError::new(check, message, violations))
}

/// Renders violations as indented text, one item or row per line.
pub fn render(violations: &Violations) -> String {
    match violations {
        Violations::Values(items) => items
            .iter()
            .map(|item| format!("  - {item}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Violations::Keyed(entries) => entries
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(label, items)| format!("  {label}: {}", items.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
        Violations::Rows { table, row_ids } => render_rows(table, row_ids.as_deref()),
    }
}

fn render_rows(table: &Table, row_ids: Option<&[usize]>) -> String {
    let mut header: Vec<String> = Vec::new();
    if row_ids.is_some() {
        header.push("row".to_string());
    }
    header.extend(table.column_names().into_iter().map(str::to_string));

    let mut lines: Vec<Vec<String>> = vec![header];
    for row in 0..table.num_rows() {
        let mut cells = Vec::with_capacity(table.num_columns() + 1);
        if let Some(ids) = row_ids {
            cells.push(ids.get(row).map_or(String::new(), ToString::to_string));
        }
        cells.extend(
            table
                .columns()
                .iter()
                .map(|c| c.get(row).map_or(String::new(), ToString::to_string)),
        );
        lines.push(cells);
    }

    let widths: Vec<usize> = (0..lines[0].len())
        .map(|i| {
            lines
                .iter()
                .map(|cells| cells[i].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    lines
        .iter()
        .map(|cells| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:>width$}"))
                .collect();
            format!("  {}", padded.join("  ").trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_results_pass() {
        assert!(ensure_none("c", "m", Violations::Values(vec![])).is_ok());
        assert!(ensure_none("c", "m", Violations::keyed(vec![("a".into(), vec![])])).is_ok());
        assert!(ensure_none("c", "m", Violations::rows(Table::empty(), None)).is_ok());
    }

    #[test]
    fn test_keyed_drops_empty_entries() {
        let v = Violations::keyed(vec![
            ("a".to_string(), vec!["1".to_string()]),
            ("b".to_string(), vec![]),
        ]);
        assert_eq!(v, Violations::Keyed(vec![("a".to_string(), vec!["1".to_string()])]));
        assert_eq!(v.get("a"), Some(&["1".to_string()][..]));
        assert_eq!(v.get("b"), None);
    }

    #[test]
    fn test_render_values() {
        let err = ensure_none(
            "range",
            "Ranges are not contiguous:",
            Violations::Values(vec!["1 -> 2".into(), "4 -> 6".into()]),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Ranges are not contiguous:\n  - 1 -> 2\n  - 4 -> 6"
        );
    }

    #[test]
    fn test_render_keyed() {
        let v = Violations::keyed(vec![("a".to_string(), vec!["1".into(), "3".into()])]);
        assert_eq!(render(&v), "  a: 1, 3");
    }

    #[test]
    fn test_render_rows_aligned() {
        let table = Table::from_rows(
            &["x", "name"],
            vec![vec![Value::Int(-1), "ab".into()], vec![Value::Int(10), "c".into()]],
        )
        .unwrap();
        let rendered = render(&Violations::rows(table, Some(vec![1, 12])));
        assert_eq!(
            rendered,
            "  row   x  name\n    1  -1    ab\n   12  10     c"
        );
    }
}
