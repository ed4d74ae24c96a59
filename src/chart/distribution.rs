//! Mirrored chart sections, one per (partition value, outcome flag).

use serde::Serialize;

use super::figure::ChartBody;
use super::mirrored::MirroredDistribution;
use crate::config::ColumnMapping;
use crate::core::constants::{labels, messages};
use crate::core::error::Result;
use crate::table::{Cell, RecordTable};

pub const OUTCOMES: [&str; 2] = [labels::YES, labels::NO];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub partition: String,
    pub outcome: &'static str,
    pub title: String,
    pub rows: usize,
    pub body: ChartBody,
}

/// Whether an outcome cell reads as `outcome` (YES or NO)
fn outcome_matches(cell: &Cell, outcome: &str) -> bool {
    match cell {
        Cell::Bool(b) => (*b && outcome == labels::YES) || (!*b && outcome == labels::NO),
        Cell::Text(s) => s.trim().eq_ignore_ascii_case(outcome),
        _ => false,
    }
}

/// Build every section in partition first-appearance order, YES before NO.
///
/// Fails only when the partition column itself is missing; any other
/// problem is reported inside the affected section.
pub fn build_sections(table: &RecordTable, columns: &ColumnMapping) -> Result<Vec<Section>> {
    let partition_idx = table.require_column(&columns.partition)?;
    let outcome_idx = table.column_index(&columns.outcome);

    let mut sections = Vec::new();
    for partition in table.distinct_values(&columns.partition)? {
        for outcome in OUTCOMES {
            let title = format!("{partition} - {}: {outcome}", columns.outcome);

            let Some(outcome_idx) = outcome_idx else {
                sections.push(Section {
                    partition: partition.clone(),
                    outcome,
                    title,
                    rows: 0,
                    body: ChartBody::Error(format!("column '{}' not found", columns.outcome)),
                });
                continue;
            };

            let subset = table.filter_rows(|row| {
                row[partition_idx].key().as_deref() == Some(partition.as_str())
                    && outcome_matches(&row[outcome_idx], outcome)
            });

            let body = if subset.is_empty() {
                ChartBody::Notice(messages::EMPTY_SELECTION.to_string())
            } else {
                match MirroredDistribution::build(&subset, columns, title.clone()) {
                    Ok(chart) if chart.is_empty() => {
                        ChartBody::Notice(messages::EMPTY_SELECTION.to_string())
                    }
                    Ok(chart) => ChartBody::Chart(chart.to_figure()),
                    Err(err) => ChartBody::Error(err.to_string()),
                }
            };

            sections.push(Section {
                partition: partition.clone(),
                outcome,
                title,
                rows: subset.row_count(),
                body,
            });
        }
    }

    Ok(sections)
}
