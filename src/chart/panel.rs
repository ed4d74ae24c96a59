//! Chart selector panels.
//!
//! Each panel is a [`PanelState`] changed one field at a time by a
//! [`PanelEvent`], and drawn by the pure [`render`] function.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use super::figure::{Dataset, Figure, FigureData, FigureType, Point};
use super::palette::palette_color;
use crate::core::constants::charts;
use crate::core::error::{Result, SheetdashError};
use crate::table::{Cell, RecordTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Histogram,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Pie,
    ];

    /// Column selectors shown for this kind
    pub fn controls(self) -> &'static [Control] {
        match self {
            ChartKind::Bar | ChartKind::Line | ChartKind::Scatter => &[Control::X, Control::Y],
            ChartKind::Histogram => &[Control::X],
            ChartKind::Pie => &[Control::Label, Control::Value],
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
            ChartKind::Histogram => "Histogram",
            ChartKind::Pie => "Pie",
        };
        f.write_str(name)
    }
}

/// A column selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    X,
    Y,
    Label,
    Value,
}

impl Control {
    pub fn caption(self) -> &'static str {
        match self {
            Control::X => "X-Axis",
            Control::Y => "Y-Axis",
            Control::Label => "Labels (Category)",
            Control::Value => "Values (Size)",
        }
    }
}

/// Selections of one panel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PanelState {
    pub kind: ChartKind,
    pub x: Option<String>,
    pub y: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
}

/// One control change sent by the page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "control", content = "value", rename_all = "lowercase")]
pub enum PanelEvent {
    Kind(ChartKind),
    X(String),
    Y(String),
    Label(String),
    Value(String),
}

impl PanelState {
    /// Bar chart with every selector on the first sorted column
    pub fn with_defaults(columns: &[String]) -> Self {
        let first = columns.first().cloned();
        Self {
            kind: ChartKind::default(),
            x: first.clone(),
            y: first.clone(),
            label: first.clone(),
            value: first,
        }
    }

    /// Apply one event. Column events must name a column of `columns`.
    pub fn apply(&mut self, event: PanelEvent, columns: &[String]) -> Result<()> {
        let check = |name: String| {
            if columns.contains(&name) {
                Ok(Some(name))
            } else {
                Err(SheetdashError::InvalidArgument(format!(
                    "column '{name}' not found"
                )))
            }
        };

        match event {
            PanelEvent::Kind(kind) => self.kind = kind,
            PanelEvent::X(name) => self.x = check(name)?,
            PanelEvent::Y(name) => self.y = check(name)?,
            PanelEvent::Label(name) => self.label = check(name)?,
            PanelEvent::Value(name) => self.value = check(name)?,
        }
        Ok(())
    }

    /// Replace selections that no longer name a column with the default
    pub fn reconcile(&mut self, columns: &[String]) {
        let fallback = columns.first().cloned();
        for slot in [&mut self.x, &mut self.y, &mut self.label, &mut self.value] {
            if !slot.as_ref().is_some_and(|name| columns.contains(name)) {
                *slot = fallback.clone();
            }
        }
    }

    pub fn selection(&self, control: Control) -> Option<&str> {
        match control {
            Control::X => self.x.as_deref(),
            Control::Y => self.y.as_deref(),
            Control::Label => self.label.as_deref(),
            Control::Value => self.value.as_deref(),
        }
    }

    fn require(&self, control: Control) -> Result<&str> {
        self.selection(control).ok_or_else(|| {
            SheetdashError::Chart(format!("no column selected for {}", control.caption()))
        })
    }
}

/// Build the chart for one panel. Pure: same table and state, same figure.
pub fn render(table: &RecordTable, state: &PanelState) -> Result<Figure> {
    match state.kind {
        ChartKind::Bar => bar(table, state.require(Control::X)?, state.require(Control::Y)?),
        ChartKind::Line => line(table, state.require(Control::X)?, state.require(Control::Y)?),
        ChartKind::Scatter => scatter(table, state.require(Control::X)?, state.require(Control::Y)?),
        ChartKind::Histogram => histogram(table, state.require(Control::X)?),
        ChartKind::Pie => pie(table, state.require(Control::Label)?, state.require(Control::Value)?),
    }
}

fn no_numeric(column: &str) -> SheetdashError {
    SheetdashError::Chart(format!("column '{column}' has no numeric values"))
}

fn axes(x: &str, y: &str) -> serde_json::Value {
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": { "legend": { "display": false } },
        "scales": {
            "x": { "title": { "display": true, "text": x } },
            "y": { "title": { "display": true, "text": y } }
        }
    })
}

fn cartesian(kind: FigureType, labels: Vec<String>, dataset: Dataset, x: &str, y: &str) -> Figure {
    Figure {
        kind,
        data: FigureData {
            labels,
            datasets: vec![dataset],
        },
        options: axes(x, y),
        height: charts::PANEL_HEIGHT,
    }
}

/// Sum numeric `value` per distinct `key`, in first-appearance order
fn sum_by_key(
    table: &RecordTable,
    key: &str,
    value: &str,
) -> Result<Vec<(String, f64)>> {
    let key_idx = table.require_column(key)?;
    let value_idx = table.require_column(value)?;

    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    let mut sums: Vec<(String, f64)> = Vec::new();
    let mut numeric = false;

    for row in table.rows() {
        let Some(k) = row[key_idx].key() else {
            continue;
        };
        let Some(v) = row[value_idx].as_f64() else {
            continue;
        };
        numeric = true;
        match positions.get(&k) {
            Some(&pos) => sums[pos].1 += v,
            None => {
                positions.insert(k.clone(), sums.len());
                sums.push((k, v));
            }
        }
    }

    if !numeric {
        return Err(no_numeric(value));
    }
    Ok(sums)
}

fn bar(table: &RecordTable, x: &str, y: &str) -> Result<Figure> {
    let (labels, data): (Vec<String>, Vec<Point>) = sum_by_key(table, x, y)?
        .into_iter()
        .map(|(k, v)| (k, Point::Value(v)))
        .unzip();

    Ok(cartesian(
        FigureType::Bar,
        labels,
        Dataset::new(y, data, palette_color(0)),
        x,
        y,
    ))
}

fn line(table: &RecordTable, x: &str, y: &str) -> Result<Figure> {
    let x_idx = table.require_column(x)?;
    let y_idx = table.require_column(y)?;

    let (labels, data): (Vec<String>, Vec<Point>) = table
        .rows()
        .filter_map(|row| {
            let value = row[y_idx].as_f64()?;
            Some((row[x_idx].to_string(), Point::Value(value)))
        })
        .unzip();

    if data.is_empty() {
        return Err(no_numeric(y));
    }

    Ok(cartesian(
        FigureType::Line,
        labels,
        Dataset::new(y, data, palette_color(0)),
        x,
        y,
    ))
}

fn scatter(table: &RecordTable, x: &str, y: &str) -> Result<Figure> {
    let x_idx = table.require_column(x)?;
    let y_idx = table.require_column(y)?;

    let data: Vec<Point> = table
        .rows()
        .filter_map(|row| {
            Some(Point::Xy {
                x: row[x_idx].as_f64()?,
                y: row[y_idx].as_f64()?,
            })
        })
        .collect();

    if data.is_empty() {
        return Err(SheetdashError::Chart(format!(
            "columns '{x}' and '{y}' have no numeric pairs"
        )));
    }

    let mut figure = cartesian(
        FigureType::Scatter,
        Vec::new(),
        Dataset::new(format!("{y} vs {x}"), data, palette_color(0)),
        x,
        y,
    );
    figure.options["scales"]["x"]["type"] = json!("linear");
    Ok(figure)
}

/// Bin count from Sturges' rule
pub fn sturges_bins(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    ((n as f64).log2().ceil() as usize) + 1
}

fn histogram(table: &RecordTable, x: &str) -> Result<Figure> {
    let values: Vec<&Cell> = table.column(x)?.filter(|c| !c.is_empty()).collect();
    if values.is_empty() {
        return Err(SheetdashError::Chart(format!("column '{x}' has no values")));
    }

    let numbers: Option<Vec<f64>> = values.iter().map(|c| c.as_f64()).collect();
    let (labels, counts) = match numbers {
        Some(numbers) => numeric_bins(&numbers),
        None => category_counts(&values),
    };

    let data = counts.into_iter().map(|c| Point::Value(c as f64)).collect();
    let mut figure = cartesian(
        FigureType::Bar,
        labels,
        Dataset::new("count", data, palette_color(0)),
        x,
        "count",
    );
    figure.options["datasets"] = json!({ "bar": { "barPercentage": 1.0, "categoryPercentage": 1.0 } });
    Ok(figure)
}

fn numeric_bins(numbers: &[f64]) -> (Vec<String>, Vec<u64>) {
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return (vec![format!("{min}")], vec![numbers.len() as u64]);
    }

    let bins = sturges_bins(numbers.len());
    let width = (max - min) / bins as f64;
    let mut counts = vec![0u64; bins];
    for &v in numbers {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let labels = (0..bins)
        .map(|i| {
            let lo = min + width * i as f64;
            format!("{} - {}", round2(lo), round2(lo + width))
        })
        .collect();
    (labels, counts)
}

fn category_counts(values: &[&Cell]) -> (Vec<String>, Vec<u64>) {
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    let mut labels = Vec::new();
    let mut counts: Vec<u64> = Vec::new();
    for cell in values {
        let key = cell.to_string();
        match positions.get(&key) {
            Some(&pos) => counts[pos] += 1,
            None => {
                positions.insert(key.clone(), labels.len());
                labels.push(key);
                counts.push(1);
            }
        }
    }
    (labels, counts)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn pie(table: &RecordTable, label: &str, value: &str) -> Result<Figure> {
    let slices: Vec<(String, f64)> = sum_by_key(table, label, value)?
        .into_iter()
        .filter(|(_, v)| *v > 0.0)
        .collect();

    if slices.is_empty() {
        return Err(SheetdashError::Chart(format!(
            "column '{value}' has no positive values"
        )));
    }

    let colors = (0..slices.len())
        .map(|i| palette_color(i).to_string())
        .collect();
    let (labels, data): (Vec<String>, Vec<Point>) = slices
        .into_iter()
        .map(|(k, v)| (k, Point::Value(v)))
        .unzip();

    Ok(Figure {
        kind: FigureType::Pie,
        data: FigureData {
            labels,
            datasets: vec![Dataset {
                label: value.to_string(),
                data,
                background_color: colors,
                hover_text: Vec::new(),
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "position": "right" } }
        }),
        height: charts::PANEL_HEIGHT,
    })
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::table::test_support::table;

    fn sample() -> RecordTable {
        table(
            &["plan_name", "fees", "college", "year"],
            &[
                &["A", "100", "Science", "2021"],
                &["B", "250", "Arts", "2022"],
                &["A", "50", "Science", "2023"],
                &["C", "", "Arts", "2024"],
            ],
        )
    }

    fn columns() -> Vec<String> {
        sample().sorted_columns()
    }

    fn state(kind: ChartKind, x: &str, y: &str) -> PanelState {
        PanelState {
            kind,
            x: Some(x.to_string()),
            y: Some(y.to_string()),
            label: Some(x.to_string()),
            value: Some(y.to_string()),
        }
    }

    #[test]
    fn test_chart_kind__display() {
        assert_eq!(ChartKind::Pie.to_string(), "Pie");
        assert_eq!(ChartKind::Scatter.to_string(), "Scatter");
    }

    #[test]
    fn test_chart_kind__controls() {
        assert_eq!(ChartKind::Bar.controls(), &[Control::X, Control::Y]);
        assert_eq!(ChartKind::Histogram.controls(), &[Control::X]);
        assert_eq!(ChartKind::Pie.controls(), &[Control::Label, Control::Value]);
    }

    #[test]
    fn test_panel_state__defaults_to_first_sorted_column() {
        let state = PanelState::with_defaults(&columns());
        assert_eq!(state.kind, ChartKind::Bar);
        assert_eq!(state.x.as_deref(), Some("college"));
        assert_eq!(state.value.as_deref(), Some("college"));

        let empty = PanelState::with_defaults(&[]);
        assert_eq!(empty.x, None);
    }

    #[test]
    fn test_panel_state__apply_changes_one_field() {
        let cols = columns();
        let mut state = PanelState::with_defaults(&cols);

        state.apply(PanelEvent::Y("fees".to_string()), &cols).unwrap();
        state.apply(PanelEvent::Kind(ChartKind::Line), &cols).unwrap();

        assert_eq!(state.kind, ChartKind::Line);
        assert_eq!(state.y.as_deref(), Some("fees"));
        assert_eq!(state.x.as_deref(), Some("college"));
    }

    #[test]
    fn test_panel_state__apply_rejects_unknown_column() {
        let cols = columns();
        let mut state = PanelState::with_defaults(&cols);
        let before = state.clone();

        let err = state
            .apply(PanelEvent::X("missing".to_string()), &cols)
            .unwrap_err();

        assert!(matches!(err, SheetdashError::InvalidArgument(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_panel_state__reconcile() {
        let mut state = state(ChartKind::Pie, "plan_name", "fees");
        let remaining = vec!["college".to_string(), "fees".to_string()];

        state.reconcile(&remaining);

        assert_eq!(state.kind, ChartKind::Pie);
        assert_eq!(state.x.as_deref(), Some("college"));
        assert_eq!(state.label.as_deref(), Some("college"));
        assert_eq!(state.y.as_deref(), Some("fees"));
        assert_eq!(state.value.as_deref(), Some("fees"));
    }

    #[test]
    fn test_panel_event__deserialize() {
        let event: PanelEvent =
            serde_json::from_str(r#"{"control":"kind","value":"Pie"}"#).unwrap();
        assert_eq!(event, PanelEvent::Kind(ChartKind::Pie));

        let event: PanelEvent =
            serde_json::from_str(r#"{"control":"label","value":"college"}"#).unwrap();
        assert_eq!(event, PanelEvent::Label("college".to_string()));
    }

    #[test]
    fn test_render__bar_sums_per_x() {
        let figure = render(&sample(), &state(ChartKind::Bar, "plan_name", "fees")).unwrap();

        assert_eq!(figure.kind, FigureType::Bar);
        assert_eq!(figure.data.labels, vec!["A", "B"]);
        assert_eq!(
            figure.data.datasets[0].data,
            vec![Point::Value(150.0), Point::Value(250.0)]
        );
    }

    #[test]
    fn test_render__line_keeps_row_order() {
        let figure = render(&sample(), &state(ChartKind::Line, "year", "fees")).unwrap();

        assert_eq!(figure.kind, FigureType::Line);
        assert_eq!(figure.data.labels, vec!["2021", "2022", "2023"]);
        assert_eq!(figure.point_count(), 3);
    }

    #[test]
    fn test_render__scatter_needs_numeric_pairs() {
        let figure = render(&sample(), &state(ChartKind::Scatter, "year", "fees")).unwrap();
        assert_eq!(
            figure.data.datasets[0].data[0],
            Point::Xy { x: 2021.0, y: 100.0 }
        );
        assert_eq!(figure.point_count(), 3);

        let err = render(&sample(), &state(ChartKind::Scatter, "college", "fees")).unwrap_err();
        assert!(matches!(err, SheetdashError::Chart(_)));
    }

    #[test]
    fn test_render__histogram_numeric_bins() {
        let figure = render(&sample(), &state(ChartKind::Histogram, "year", "ignored")).unwrap();

        // 4 values -> ceil(log2 4) + 1 = 3 bins
        assert_eq!(figure.data.labels.len(), 3);
        let total: f64 = figure.data.datasets[0]
            .data
            .iter()
            .map(|p| match p {
                Point::Value(v) => *v,
                Point::Xy { .. } => 0.0,
            })
            .sum();
        assert_eq!(total, 4.0);
    }

    #[test]
    fn test_render__histogram_categories() {
        let figure = render(&sample(), &state(ChartKind::Histogram, "college", "fees")).unwrap();

        assert_eq!(figure.data.labels, vec!["Science", "Arts"]);
        assert_eq!(
            figure.data.datasets[0].data,
            vec![Point::Value(2.0), Point::Value(2.0)]
        );
    }

    #[test]
    fn test_render__histogram_single_value() {
        let t = table(&["n"], &[&["5"], &["5"]]);
        let figure = render(&t, &state(ChartKind::Histogram, "n", "n")).unwrap();
        assert_eq!(figure.data.labels, vec!["5"]);
        assert_eq!(figure.data.datasets[0].data, vec![Point::Value(2.0)]);
    }

    #[test]
    fn test_render__pie_keyed_by_label() {
        let t = table(
            &["college", "count"],
            &[&["Science", "3"], &["Arts", "1"], &["Science", "2"]],
        );
        let state = PanelState {
            kind: ChartKind::Pie,
            x: None,
            y: None,
            label: Some("college".to_string()),
            value: Some("count".to_string()),
        };

        let figure = render(&t, &state).unwrap();

        assert_eq!(figure.kind, FigureType::Pie);
        assert_eq!(figure.data.labels, vec!["Science", "Arts"]);
        assert_eq!(
            figure.data.datasets[0].data,
            vec![Point::Value(5.0), Point::Value(1.0)]
        );
        assert!(figure.options.get("scales").is_none());
    }

    #[test]
    fn test_render__non_numeric_value_is_chart_error() {
        let err = render(&sample(), &state(ChartKind::Bar, "plan_name", "college")).unwrap_err();
        assert!(matches!(err, SheetdashError::Chart(ref msg) if msg.contains("college")));

        let err = render(&sample(), &state(ChartKind::Pie, "plan_name", "college")).unwrap_err();
        assert!(matches!(err, SheetdashError::Chart(_)));
    }

    #[test]
    fn test_render__missing_selection() {
        let err = render(&sample(), &PanelState::default()).unwrap_err();
        assert!(matches!(err, SheetdashError::Chart(ref msg) if msg.contains("X-Axis")));
    }

    #[test]
    fn test_render__is_pure() {
        let t = sample();
        let s = state(ChartKind::Bar, "college", "fees");
        assert_eq!(render(&t, &s).unwrap(), render(&t, &s).unwrap());
    }

    #[test]
    fn test_sturges_bins() {
        assert_eq!(sturges_bins(0), 1);
        assert_eq!(sturges_bins(1), 1);
        assert_eq!(sturges_bins(8), 4);
        assert_eq!(sturges_bins(100), 8);
    }
}
