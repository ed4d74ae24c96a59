//! Shared application state for the dashboard server.

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::chart::PanelState;
use crate::config::{ColumnMapping, Settings};
use crate::core::constants::charts::PANEL_COUNT;
use crate::core::error::Result;
use crate::loader::{LoadOutcome, Loader, SharedTable};
use crate::storage::BlobClient;

/// Where the table comes from
pub enum DataSource {
    Ready(SharedTable),
    /// Storage settings were missing or unusable; every page shows this
    Misconfigured(String),
}

/// View state of the selector panels, kept in step with the table columns
#[derive(Debug, Default)]
pub struct PanelBoard {
    panels: [PanelState; PANEL_COUNT],
    columns: Vec<String>,
}

impl PanelBoard {
    /// Reconcile every panel when the sorted column list has changed
    pub fn sync(&mut self, sorted_columns: &[String]) {
        if self.columns == sorted_columns {
            return;
        }
        for panel in &mut self.panels {
            panel.reconcile(sorted_columns);
        }
        self.columns = sorted_columns.to_vec();
    }

    pub fn get(&self, index: usize) -> Option<&PanelState> {
        self.panels.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PanelState> {
        self.panels.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelState> {
        self.panels.iter()
    }
}

/// Shared state available to all request handlers.
pub struct AppState {
    pub source: DataSource,

    pub columns: ColumnMapping,

    /// Title shown on every page
    pub title: String,

    panels: Mutex<PanelBoard>,

    /// Server start time (for uptime reporting).
    pub started_at: Instant,

    /// Total requests served (for /health).
    pub total_requests: AtomicU64,
}

impl AppState {
    pub fn new(source: DataSource, columns: ColumnMapping, title: impl Into<String>) -> Self {
        Self {
            source,
            columns,
            title: title.into(),
            panels: Mutex::new(PanelBoard::default()),
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
        }
    }

    /// Build the state from resolved settings. A storage problem does not
    /// fail here; it becomes [`DataSource::Misconfigured`].
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let source = match settings.storage {
            Ok(location) => {
                let client = BlobClient::new(settings.timeout)?;
                DataSource::Ready(SharedTable::new(Loader::new(Arc::new(client), location)))
            }
            Err(err) => DataSource::Misconfigured(err.to_string()),
        };
        Ok(Self::new(source, settings.columns, settings.title))
    }

    /// The memoized load, or the configuration error
    pub async fn dataset(&self) -> std::result::Result<Arc<LoadOutcome>, String> {
        match self.source {
            DataSource::Ready(ref shared) => Ok(shared.get().await),
            DataSource::Misconfigured(ref message) => Err(message.clone()),
        }
    }

    /// Drop the memoized table and load again
    pub async fn refresh(&self) -> std::result::Result<Arc<LoadOutcome>, String> {
        match self.source {
            DataSource::Ready(ref shared) => Ok(shared.refresh().await),
            DataSource::Misconfigured(ref message) => Err(message.clone()),
        }
    }

    /// Fetches performed so far
    pub fn load_count(&self) -> u64 {
        match self.source {
            DataSource::Ready(ref shared) => shared.load_count(),
            DataSource::Misconfigured(_) => 0,
        }
    }

    /// Panel board synced to `sorted_columns`
    pub fn panels(&self, sorted_columns: &[String]) -> MutexGuard<'_, PanelBoard> {
        let mut board = self
            .panels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        board.sync(sorted_columns);
        board
    }
}

/// Type alias used in axum handlers.
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, PanelEvent};
    use crate::config::Config;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_board_sync_fills_defaults() {
        let mut board = PanelBoard::default();
        board.sync(&cols(&["college", "fees"]));

        assert_eq!(board.iter().count(), PANEL_COUNT);
        assert!(board.iter().all(|p| p.x.as_deref() == Some("college")));
        assert!(board.get(PANEL_COUNT).is_none());
    }

    #[test]
    fn test_board_keeps_selections_while_columns_unchanged() {
        let columns = cols(&["college", "fees"]);
        let mut board = PanelBoard::default();
        board.sync(&columns);

        let panel = board.get_mut(2).unwrap();
        panel.apply(PanelEvent::Kind(ChartKind::Pie), &columns).unwrap();
        panel.apply(PanelEvent::Value("fees".to_string()), &columns).unwrap();
        board.sync(&columns);

        let panel = board.get(2).unwrap();
        assert_eq!(panel.kind, ChartKind::Pie);
        assert_eq!(panel.value.as_deref(), Some("fees"));
        // Other panels are independent
        assert_eq!(board.get(1).unwrap().kind, ChartKind::Bar);
    }

    #[test]
    fn test_board_reconciles_on_column_change() {
        let mut board = PanelBoard::default();
        board.sync(&cols(&["college", "fees"]));
        let columns = cols(&["college", "fees"]);
        board
            .get_mut(0)
            .unwrap()
            .apply(PanelEvent::Y("fees".to_string()), &columns)
            .unwrap();

        board.sync(&cols(&["amount", "college"]));

        let panel = board.get(0).unwrap();
        assert_eq!(panel.y.as_deref(), Some("amount"));
        assert_eq!(panel.x.as_deref(), Some("college"));
    }

    #[test]
    fn test_from_settings_misconfigured() {
        let settings = Config::default().resolve().unwrap();
        let state = AppState::from_settings(settings).unwrap();

        assert!(matches!(state.source, DataSource::Misconfigured(ref m) if m.contains("AZURE_STORAGE_CONNECTION_STRING")));
        assert_eq!(state.load_count(), 0);
    }

    #[tokio::test]
    async fn test_dataset_reports_configuration_error() {
        let state = AppState::new(
            DataSource::Misconfigured("missing container".to_string()),
            ColumnMapping::default(),
            "Dashboard",
        );

        assert_eq!(state.dataset().await.unwrap_err(), "missing container");
        assert!(state.refresh().await.is_err());
    }
}
