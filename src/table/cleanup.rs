//! Light normalisation applied once after parsing.

use rustc_hash::FxHashMap;

use super::{Cell, RecordTable};

const UNNAMED_PREFIX: &str = "Unnamed: ";

impl RecordTable {
    /// Trim headers and text, name blank headers, de-duplicate header
    /// names, then drop blank rows and blank unnamed columns.
    pub fn cleaned(self) -> Self {
        let columns = normalize_headers(&self.columns);

        let rows: Vec<Vec<Cell>> = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(trim_cell).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .collect();

        let keep: Vec<bool> = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                !name.starts_with(UNNAMED_PREFIX) || rows.iter().any(|row| !row[idx].is_empty())
            })
            .collect();

        let columns = columns
            .into_iter()
            .zip(&keep)
            .filter_map(|(name, keep)| keep.then_some(name))
            .collect();
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&keep)
                    .filter_map(|(cell, keep)| keep.then_some(cell))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }
}

fn trim_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Cell::Empty
            } else if trimmed.len() == s.len() {
                Cell::Text(s)
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        other => other,
    }
}

fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();

    raw.iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = match name.trim() {
                "" => format!("{UNNAMED_PREFIX}{idx}"),
                trimmed => trimmed.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}
