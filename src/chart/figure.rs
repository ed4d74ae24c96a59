use serde::Serialize;
use serde_json::Value;

/// Chart.js chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureType {
    Bar,
    Line,
    Scatter,
    Pie,
}

/// One data point: a bare value aligned with `labels`, or an x/y pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Point {
    Value(f64),
    Xy { x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Point>,
    pub background_color: Vec<String>,
    /// Tooltip text per point, replacing the plotted value
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hover_text: Vec<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<Point>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: vec![color.into()],
            hover_text: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FigureData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Chart description handed to the browser as-is.
///
/// Serializes to the `{type, data, options}` shape `new Chart(ctx, cfg)`
/// accepts, plus the pixel height the page should reserve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    #[serde(rename = "type")]
    pub kind: FigureType,
    pub data: FigureData,
    pub options: Value,
    pub height: u32,
}

/// What a chart slot on the page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum ChartBody {
    Chart(Figure),
    /// Nothing to draw for this selection
    Notice(String),
    Error(String),
}

impl Figure {
    #[cfg(test)]
    pub fn point_count(&self) -> usize {
        self.data.datasets.iter().map(|d| d.data.len()).sum()
    }
}
