//! Diverging horizontal bar chart of enrolled against not-enrolled counts.

use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use super::figure::{Dataset, Figure, FigureData, FigureType, Point};
use super::palette::{ColorMap, with_opacity};
use crate::config::ColumnMapping;
use crate::core::constants::{charts, labels};
use crate::core::error::Result;
use crate::table::{Cell, GroupKey, RecordTable};

/// Counts for one group value. `left` is the negated Not Enrolled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirroredBar {
    pub group: String,
    pub color: &'static str,
    pub left: i64,
    pub right: u64,
}

impl MirroredBar {
    /// Rows counted on either side
    #[cfg(test)]
    pub fn total(&self) -> u64 {
        self.left.unsigned_abs() + self.right
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirroredDistribution {
    pub title: String,
    pub bars: Vec<MirroredBar>,
}

impl MirroredDistribution {
    /// Count rows per (group, status) and pair them into bars.
    ///
    /// Groups come out ordered by key, numbers by value before text. Rows with an empty group or status
    /// are skipped; statuses other than Enrolled and Not Enrolled still make
    /// their group appear but add to neither side.
    pub fn build(
        table: &RecordTable,
        columns: &ColumnMapping,
        title: impl Into<String>,
    ) -> Result<Self> {
        let group_idx = table.require_column(&columns.group)?;
        let status_idx = table.require_column(&columns.status)?;

        // (not enrolled, enrolled) per group
        let mut counts: BTreeMap<GroupKey, (u64, u64)> = BTreeMap::new();
        for row in table.rows() {
            let status = &row[status_idx];
            if status.is_empty() {
                continue;
            }
            let Some(group) = row[group_idx].group_key() else {
                continue;
            };
            let entry = counts.entry(group).or_default();
            match status {
                Cell::Text(s) if s == labels::NOT_ENROLLED => entry.0 += 1,
                Cell::Text(s) if s == labels::ENROLLED => entry.1 += 1,
                _ => {}
            }
        }

        let groups: Vec<String> = counts.keys().map(GroupKey::to_string).collect();
        let colors = ColorMap::assign(groups.iter().map(String::as_str));

        let bars = groups
            .into_iter()
            .zip(counts.into_values())
            .map(|(group, (not_enrolled, enrolled))| MirroredBar {
                color: colors.get(&group).unwrap_or(charts::PALETTE[0]),
                group,
                left: -(not_enrolled as i64),
                right: enrolled,
            })
            .collect();

        Ok(Self {
            title: title.into(),
            bars,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn height(&self) -> u32 {
        charts::MIRRORED_BASE_HEIGHT + self.bars.len() as u32 * charts::MIRRORED_ROW_HEIGHT
    }

    #[cfg(test)]
    pub fn bar(&self, group: &str) -> Option<&MirroredBar> {
        self.bars.iter().find(|b| b.group == group)
    }

    pub fn to_figure(&self) -> Figure {
        let groups: Vec<String> = self.bars.iter().map(|b| b.group.clone()).collect();

        let left = Dataset {
            label: labels::NOT_ENROLLED.to_string(),
            data: self.bars.iter().map(|b| Point::Value(b.left as f64)).collect(),
            background_color: self
                .bars
                .iter()
                .map(|b| with_opacity(b.color, charts::LEFT_OPACITY))
                .collect(),
            hover_text: self
                .bars
                .iter()
                .map(|b| format!("{}: {}", labels::NOT_ENROLLED, b.left.unsigned_abs()))
                .collect(),
        };
        let right = Dataset {
            label: labels::ENROLLED.to_string(),
            data: self.bars.iter().map(|b| Point::Value(b.right as f64)).collect(),
            background_color: self.bars.iter().map(|b| b.color.to_string()).collect(),
            hover_text: self
                .bars
                .iter()
                .map(|b| format!("{}: {}", labels::ENROLLED, b.right))
                .collect(),
        };

        Figure {
            kind: FigureType::Bar,
            data: FigureData {
                labels: groups,
                datasets: vec![left, right],
            },
            options: json!({
                "indexAxis": "y",
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": {
                    "title": { "display": true, "text": self.title },
                    "legend": { "display": false }
                },
                "scales": {
                    "x": {
                        "stacked": true,
                        "title": {
                            "display": true,
                            "text": format!("{}  |  {}", labels::NOT_ENROLLED, labels::ENROLLED)
                        },
                        "ticks": { "absolute": true }
                    },
                    "y": { "stacked": true }
                }
            }),
            height: self.height(),
        }
    }
}
