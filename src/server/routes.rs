//! HTTP route handlers for the dashboard server.
//!
//! Two HTML pages, plus the JSON endpoints their scripts talk to.

use std::sync::atomic::Ordering;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::page;
use super::state::{DataSource, SharedState};
use crate::chart::{ChartBody, ChartKind, Control, PanelEvent, PanelState, Section};
use crate::chart::{build_sections, render};
use crate::core::constants::charts::{PANEL_COUNT, PREVIEW_ROWS};
use crate::core::constants::messages;
use crate::loader::LoadOutcome;
use crate::table::{Cell, RecordTable};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(selector_page_handler))
        .route("/distribution", get(distribution_page_handler))
        .route("/api/dataset", get(dataset_handler))
        .route("/api/panels", get(panels_handler))
        .route(
            "/api/panels/{index}",
            get(panel_handler).post(update_panel_handler),
        )
        .route("/api/distribution", get(distribution_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

async fn selector_page_handler(State(state): State<SharedState>) -> Html<String> {
    Html(page::selector_page(&state.title))
}

async fn distribution_page_handler(State(state): State<SharedState>) -> Html<String> {
    Html(page::distribution_page(&state.title))
}

// ---------------------------------------------------------------------------
// GET /api/dataset, POST /api/refresh
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Status banner and table summary
#[derive(Debug, Serialize)]
pub struct DatasetView {
    pub title: String,
    pub status: LoadStatus,
    pub message: String,
    /// Shown instead of charts when there is nothing to plot
    pub notice: Option<String>,
    pub source: Option<String>,
    pub rows: usize,
    pub columns: Vec<String>,
    pub preview: Option<Preview>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl DatasetView {
    fn misconfigured(title: &str, message: String) -> Self {
        Self {
            title: title.to_string(),
            status: LoadStatus::Error,
            message,
            notice: Some(messages::NO_DATA.to_string()),
            source: None,
            rows: 0,
            columns: Vec::new(),
            preview: None,
            loaded_at: None,
        }
    }

    fn from_outcome(title: &str, source: String, outcome: &LoadOutcome) -> Self {
        let table = &outcome.table;
        let (status, message, notice) = match outcome.warning {
            Some(ref warning) => (
                LoadStatus::Warning,
                warning.clone(),
                Some(messages::NO_DATA.to_string()),
            ),
            None if table.is_empty() => (
                LoadStatus::Warning,
                messages::NO_DATA.to_string(),
                Some(messages::NO_DATA.to_string()),
            ),
            None => (LoadStatus::Ok, messages::LOAD_SUCCESS.to_string(), None),
        };

        let preview = (!table.is_empty()).then(|| {
            let head = table.head(PREVIEW_ROWS);
            Preview {
                columns: head.columns().to_vec(),
                rows: head.rows().map(<[Cell]>::to_vec).collect(),
            }
        });

        Self {
            title: title.to_string(),
            status,
            message,
            notice,
            source: Some(source),
            rows: table.row_count(),
            columns: table.sorted_columns(),
            preview,
            loaded_at: Some(outcome.loaded_at),
        }
    }
}

fn source_description(state: &SharedState) -> String {
    match state.source {
        DataSource::Ready(ref shared) => shared.location().to_string(),
        DataSource::Misconfigured(_) => String::new(),
    }
}

async fn dataset_handler(State(state): State<SharedState>) -> Json<DatasetView> {
    Json(match state.dataset().await {
        Ok(outcome) => DatasetView::from_outcome(&state.title, source_description(&state), &outcome),
        Err(message) => DatasetView::misconfigured(&state.title, message),
    })
}

async fn refresh_handler(State(state): State<SharedState>) -> Json<DatasetView> {
    Json(match state.refresh().await {
        Ok(outcome) => DatasetView::from_outcome(&state.title, source_description(&state), &outcome),
        Err(message) => DatasetView::misconfigured(&state.title, message),
    })
}

// ---------------------------------------------------------------------------
// Selector panels
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ControlView {
    pub control: Control,
    pub caption: String,
    pub selected: Option<String>,
}

/// Everything the page needs to draw one panel
#[derive(Debug, Serialize)]
pub struct PanelView {
    pub index: usize,
    pub title: String,
    pub state: PanelState,
    pub kinds: Vec<String>,
    pub controls: Vec<ControlView>,
    pub columns: Vec<String>,
    pub body: ChartBody,
}

impl PanelView {
    fn build(index: usize, panel: &PanelState, table: &RecordTable, columns: &[String]) -> Self {
        let number = index + 1;
        let controls = panel
            .kind
            .controls()
            .iter()
            .map(|&control| ControlView {
                control,
                caption: match panel.kind {
                    ChartKind::Pie => format!("{} for Pie {number}", control.caption()),
                    _ => format!("{} {number}", control.caption()),
                },
                selected: panel.selection(control).map(str::to_string),
            })
            .collect();

        let body = if table.is_empty() {
            ChartBody::Notice(messages::NO_DATA.to_string())
        } else {
            match render(table, panel) {
                Ok(figure) => ChartBody::Chart(figure),
                Err(err) => ChartBody::Error(err.to_string()),
            }
        };

        Self {
            index,
            title: format!("Chart {number}"),
            state: panel.clone(),
            kinds: ChartKind::ALL.iter().map(ChartKind::to_string).collect(),
            controls,
            columns: columns.to_vec(),
            body,
        }
    }
}

fn check_index(index: usize) -> Result<usize, AppError> {
    if index < PANEL_COUNT {
        Ok(index)
    } else {
        Err(AppError::not_found(format!(
            "panel {index} does not exist (0-{})",
            PANEL_COUNT - 1
        )))
    }
}

async fn panels_handler(State(state): State<SharedState>) -> Result<Json<Vec<PanelView>>, AppError> {
    let outcome = state.dataset().await.map_err(AppError::unavailable)?;
    let columns = outcome.table.sorted_columns();

    let board = state.panels(&columns);
    let views = board
        .iter()
        .enumerate()
        .map(|(index, panel)| PanelView::build(index, panel, &outcome.table, &columns))
        .collect();
    Ok(Json(views))
}

async fn panel_handler(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> Result<Json<PanelView>, AppError> {
    let index = check_index(index)?;
    let outcome = state.dataset().await.map_err(AppError::unavailable)?;
    let columns = outcome.table.sorted_columns();

    let board = state.panels(&columns);
    let panel = board
        .get(index)
        .ok_or_else(|| AppError::not_found(format!("panel {index} does not exist")))?;
    Ok(Json(PanelView::build(index, panel, &outcome.table, &columns)))
}

/// Apply one control change and re-render only that panel
async fn update_panel_handler(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Json(event): Json<PanelEvent>,
) -> Result<Json<PanelView>, AppError> {
    let index = check_index(index)?;
    let outcome = state.dataset().await.map_err(AppError::unavailable)?;
    let columns = outcome.table.sorted_columns();

    let mut board = state.panels(&columns);
    let panel = board
        .get_mut(index)
        .ok_or_else(|| AppError::not_found(format!("panel {index} does not exist")))?;
    panel
        .apply(event, &columns)
        .map_err(|e| AppError::bad_request(e.to_string()))?;
    Ok(Json(PanelView::build(index, panel, &outcome.table, &columns)))
}

// ---------------------------------------------------------------------------
// GET /api/distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DistributionView {
    pub title: String,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub sections: Vec<Section>,
}

async fn distribution_handler(
    State(state): State<SharedState>,
) -> Result<Json<DistributionView>, AppError> {
    let outcome = state.dataset().await.map_err(AppError::unavailable)?;
    let title = format!("{} - Enrollment by {}", state.title, state.columns.group);

    if outcome.table.is_empty() {
        return Ok(Json(DistributionView {
            title,
            notice: Some(messages::NO_DATA.to_string()),
            error: None,
            sections: Vec::new(),
        }));
    }

    let view = match build_sections(&outcome.table, &state.columns) {
        Ok(sections) => DistributionView {
            title,
            notice: None,
            error: None,
            sections,
        },
        Err(err) => DistributionView {
            title,
            notice: None,
            error: Some(err.to_string()),
            sections: Vec::new(),
        },
    };
    Ok(Json(view))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_s: f64,
    total_requests: u64,
    loads: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_s: state.started_at.elapsed().as_secs_f64(),
        total_requests: state.total_requests.load(Ordering::Relaxed),
        loads: state.load_count(),
    })
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Structured JSON error response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(msg: String) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: msg }
    }

    fn not_found(msg: String) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: msg }
    }

    /// No data source: the configuration is incomplete
    fn unavailable(msg: String) -> Self {
        Self { status: StatusCode::SERVICE_UNAVAILABLE, message: msg }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}
