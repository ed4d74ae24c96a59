//! sheetdash serves interactive charts over a single spreadsheet kept in
//! Azure Blob Storage.
//!
//! The spreadsheet is fetched once, cleaned, and held in a memoized
//! [`loader::SharedTable`]. Two pages sit on top of it: four independently
//! configured selector panels, and mirrored enrolled/not-enrolled bar charts
//! per partition and outcome.

pub mod chart;
pub mod cli;
pub mod config;
pub mod core;
pub mod loader;
pub mod logging;
pub mod server;
pub mod storage;
pub mod table;

pub use crate::core::error::{Result, SheetdashError};
pub use config::{CliConfig, ColumnMapping, Config, Settings};
pub use loader::{LoadOutcome, Loader, SharedTable};
pub use table::{Cell, RecordTable};
