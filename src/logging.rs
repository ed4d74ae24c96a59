use crate::config::Settings;
use crate::storage::StorageLocation;
use crate::table::RecordTable;
use log::{Level, LevelFilter, debug, error, info, log, warn};

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = level_for(verbose, quiet);

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// `quiet` wins over `verbose`
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Log resolved settings. Credentials are never printed.
pub fn log_config_info(settings: &Settings) {
    info!(
        "Configuration: bind={}, timeout={}s, title={:?}",
        settings.bind_address(),
        settings.timeout.as_secs(),
        settings.title
    );
    info!(
        "Columns: group={}, status={}, partition={}, outcome={}",
        settings.columns.group,
        settings.columns.status,
        settings.columns.partition,
        settings.columns.outcome
    );
    match settings.storage {
        Ok(ref location) => info!("Storage: {location}"),
        Err(ref err) => warn!("Storage not configured: {err}"),
    }
}

/// Log a successful spreadsheet load
pub fn log_load_success(
    location: &StorageLocation,
    bytes: usize,
    table: &RecordTable,
    duration_ms: u128,
) {
    info!(
        "Loaded {} rows x {} columns from {location} ({bytes} bytes, {duration_ms}ms)",
        table.row_count(),
        table.columns().len()
    );
    debug!("Columns: {}", table.columns().join(", "));
}

/// Log one handled HTTP request
pub fn log_request(method: &str, path: &str, status: u16, duration_ms: u128) {
    log!(
        request_level(status),
        "{method} {path} -> {status} ({duration_ms}ms)"
    );
}

/// Server errors are surfaced, everything else is debug noise
fn request_level(status: u16) -> Level {
    if status >= 500 { Level::Warn } else { Level::Debug }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::error::SheetdashError;
    use crate::table::Cell;
    use std::io;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(true, false), LevelFilter::Debug);
        assert_eq!(level_for(false, true), LevelFilter::Warn);
        // quiet takes precedence
        assert_eq!(level_for(true, true), LevelFilter::Warn);
    }

    #[test]
    fn test_request_level() {
        assert_eq!(request_level(200), Level::Debug);
        assert_eq!(request_level(404), Level::Debug);
        assert_eq!(request_level(503), Level::Warn);
    }

    #[test]
    fn test_log_config_info_without_storage() {
        let settings = Config::default().resolve().unwrap();
        assert!(settings.storage.is_err());
        log_config_info(&settings);
    }

    #[test]
    fn test_log_config_info_with_storage() {
        let config = Config {
            connection_string: Some("AccountName=acct;AccountKey=a2V5".to_string()),
            container: Some("uploads".to_string()),
            ..Default::default()
        };
        let settings = config.resolve().unwrap();
        assert!(settings.storage.is_ok());
        log_config_info(&settings);
    }

    #[test]
    fn test_log_load_success() {
        let config = Config {
            connection_string: Some("AccountName=acct".to_string()),
            container: Some("uploads".to_string()),
            ..Default::default()
        };
        let location = config.storage_location().unwrap();
        let table = RecordTable::new(
            vec!["a".to_string()],
            vec![vec![Cell::Number(1.0)], vec![Cell::Empty]],
        );
        log_load_success(&location, 2048, &table, 15);
        log_load_success(&location, 0, &RecordTable::empty(), 0);
    }

    #[test]
    fn test_log_helpers_smoke() {
        // Logger can only be initialized once per process
        std::panic::catch_unwind(|| init_logger(true, false)).ok();

        log_request("GET", "/api/distribution", 500, 12);
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        log_error("Failed to read file", Some(&io_error));
        log_error("Render failed", Some(&SheetdashError::Chart("x".to_string())));
        log_error("Something went wrong", None);
        log_warning("Failed to load data from Azure Blob: Storage error: 403");
    }
}
