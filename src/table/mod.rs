//! In-memory record table
//!
//! A rectangular dataset with named columns, parsed once from the
//! spreadsheet, cleaned, and read-only afterwards.

mod cell;
mod cleanup;
pub mod xlsx;

pub use cell::{Cell, GroupKey};
pub use xlsx::parse_xlsx;

use rustc_hash::FxHashSet;

use crate::core::error::{Result, SheetdashError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordTable {
    /// Build a table, padding or truncating every row to the header width
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Fallback returned when loading fails
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column names in lexicographic order, as offered by the selectors
    pub fn sorted_columns(&self) -> Vec<String> {
        let mut names = self.columns.clone();
        names.sort();
        names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SheetdashError::Chart(format!("column '{name}' not found")))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cells of one column in row order
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Cell>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Rows kept by `keep`, same columns
    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(&[Cell]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Distinct non-empty values of a column in first-appearance order
    pub fn distinct_values(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = FxHashSet::default();
        let mut values = Vec::new();
        for key in self.column(name)?.filter_map(Cell::key) {
            if seen.insert(key.clone()) {
                values.push(key);
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Cell, RecordTable};

    /// Table from string literals; numeric-looking values become numbers
    /// and empty strings become empty cells.
    pub fn table(columns: &[&str], rows: &[&[&str]]) -> RecordTable {
        RecordTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| cell(v)).collect())
                .collect(),
        )
    }

    pub fn cell(value: &str) -> Cell {
        if value.is_empty() {
            Cell::Empty
        } else if let Ok(n) = value.parse::<f64>() {
            Cell::Number(n)
        } else {
            Cell::Text(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::table;
    use super::*;

    fn sample() -> RecordTable {
        table(
            &["plan_name", "college", "count"],
            &[
                &["B", "Science", "3"],
                &["A", "Arts", "1"],
                &["B", "Arts", ""],
                &["C", "Science", "2"],
            ],
        )
    }

    #[test]
    fn test_new_pads_short_rows() {
        let t = RecordTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::Number(1.0)]],
        );
        assert_eq!(t.rows().next().unwrap(), &[Cell::Number(1.0), Cell::Empty]);
    }

    #[test]
    fn test_empty() {
        let t = RecordTable::empty();
        assert!(t.is_empty());
        assert_eq!(t.row_count(), 0);
        assert!(t.columns().is_empty());
    }

    #[test]
    fn test_sorted_columns() {
        assert_eq!(sample().sorted_columns(), vec!["college", "count", "plan_name"]);
        // Original order is untouched
        assert_eq!(sample().columns()[0], "plan_name");
    }

    #[test]
    fn test_column_lookup() -> Result<()> {
        let t = sample();
        let plans: Vec<String> = t.column("plan_name")?.map(Cell::to_string).collect();
        assert_eq!(plans, vec!["B", "A", "B", "C"]);
        assert!(t.column("missing").is_err());
        assert_eq!(t.column_index("college"), Some(1));
        Ok(())
    }

    #[test]
    fn test_filter_rows_and_head() {
        let t = sample();
        let arts = t.filter_rows(|row| row[1] == Cell::Text("Arts".to_string()));
        assert_eq!(arts.row_count(), 2);
        assert_eq!(arts.columns(), t.columns());
        assert_eq!(t.head(3).row_count(), 3);
        assert_eq!(t.head(10).row_count(), 4);
    }

    #[test]
    fn test_distinct_values_first_appearance() -> Result<()> {
        let t = sample();
        assert_eq!(t.distinct_values("college")?, vec!["Science", "Arts"]);
        assert_eq!(t.distinct_values("count")?, vec!["3", "1", "2"]);
        Ok(())
    }
}
