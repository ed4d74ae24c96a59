//! Configuration management
//!
//! This module handles loading configuration from TOML files, the
//! environment and CLI arguments, and resolving it once into typed settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{columns, env_vars, server, storage, timeouts};
use crate::core::error::{Result, SheetdashError};
use crate::storage::{ConnectionString, StorageLocation};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Azure storage connection string
    pub connection_string: Option<String>,

    /// Container holding the spreadsheet
    pub container: Option<String>,

    /// Object name inside the container
    pub blob_name: Option<String>,

    /// Bind address
    pub host: Option<String>,

    /// Listening port
    pub port: Option<u16>,

    /// Timeout in seconds for the blob download
    pub timeout: Option<u64>,

    /// Title shown on every page
    pub title: Option<String>,

    /// Column whose values form the mirrored chart's category axis
    pub group_column: Option<String>,

    /// Enrollment status column
    pub status_column: Option<String>,

    /// Top-level partition column (one chart section per value)
    pub partition_column: Option<String>,

    /// YES/NO outcome flag column
    pub outcome_column: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection_string: None,
            container: None,
            blob_name: Some(storage::DEFAULT_BLOB_NAME.to_string()),
            host: Some(server::DEFAULT_HOST.to_string()),
            port: Some(server::DEFAULT_PORT),
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            title: Some(server::DEFAULT_TITLE.to_string()),
            group_column: Some(columns::GROUP.to_string()),
            status_column: Some(columns::STATUS.to_string()),
            partition_column: Some(columns::PARTITION.to_string()),
            outcome_column: Some(columns::OUTCOME.to_string()),
            verbose: Some(false),
        }
    }
}

/// Column names the mirrored distribution chart reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub group: String,
    pub status: String,
    pub partition: String,
    pub outcome: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            group: columns::GROUP.to_string(),
            status: columns::STATUS.to_string(),
            partition: columns::PARTITION.to_string(),
            outcome: columns::OUTCOME.to_string(),
        }
    }
}

/// Settings resolved from a validated [`Config`]
#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub title: String,
    pub timeout: Duration,
    pub columns: ColumnMapping,
    /// Storage problems are kept rather than raised so the server can
    /// still come up and report them on every page.
    pub storage: Result<StorageLocation>,
}

impl Settings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SheetdashError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            SheetdashError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(server::CONFIG_FILE_NAME) {
            return config;
        }

        for i in 1..=3 {
            let path = format!("{}{}", "../".repeat(i), server::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge values from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_env_from(|key| std::env::var(key).ok())
    }

    /// Merge values from an environment lookup. Empty values are ignored.
    pub fn merge_with_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(conn) = read(env_vars::CONNECTION_STRING) {
            self.connection_string = Some(conn);
        }
        if let Some(container) = read(env_vars::CONTAINER) {
            self.container = Some(container);
        }
        if let Some(port) = read(env_vars::PORT) {
            let port = port.trim().parse::<u16>().map_err(|_| {
                SheetdashError::Config(format!(
                    "{} must be a port number, got '{port}'",
                    env_vars::PORT
                ))
            })?;
            self.port = Some(port);
        }
        Ok(())
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(port) = cli_config.port {
            self.port = Some(port);
        }
        if let Some(ref host) = cli_config.host {
            self.host = Some(host.clone());
        }
        if let Some(ref container) = cli_config.container {
            self.container = Some(container.clone());
        }
        if let Some(ref blob_name) = cli_config.blob_name {
            self.blob_name = Some(blob_name.clone());
        }
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if cli_config.verbose {
            self.verbose = Some(true);
        }
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Column names with defaults filled in
    pub fn column_mapping(&self) -> ColumnMapping {
        let defaults = ColumnMapping::default();
        ColumnMapping {
            group: self.group_column.clone().unwrap_or(defaults.group),
            status: self.status_column.clone().unwrap_or(defaults.status),
            partition: self.partition_column.clone().unwrap_or(defaults.partition),
            outcome: self.outcome_column.clone().unwrap_or(defaults.outcome),
        }
    }

    /// Build the storage location from the connection string and container
    pub fn storage_location(&self) -> Result<StorageLocation> {
        let conn = self
            .connection_string
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                SheetdashError::Config(format!(
                    "Missing storage connection string. Set {} or `connection_string` in {}.",
                    env_vars::CONNECTION_STRING,
                    server::CONFIG_FILE_NAME
                ))
            })?;
        let container = self
            .container
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                SheetdashError::Config(format!(
                    "Missing blob container. Set {} or `container` in {}.",
                    env_vars::CONTAINER,
                    server::CONFIG_FILE_NAME
                ))
            })?;
        let blob = self
            .blob_name
            .clone()
            .unwrap_or_else(|| storage::DEFAULT_BLOB_NAME.to_string());

        Ok(StorageLocation {
            connection: ConnectionString::parse(conn)?,
            container: container.trim().to_string(),
            blob,
        })
    }

    /// Validate, then resolve into typed settings
    pub fn resolve(&self) -> Result<Settings> {
        self.validate()?;

        Ok(Settings {
            host: self
                .host
                .clone()
                .unwrap_or_else(|| server::DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(server::DEFAULT_PORT),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| server::DEFAULT_TITLE.to_string()),
            timeout: self.timeout_duration(),
            columns: self.column_mapping(),
            storage: self.storage_location(),
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(SheetdashError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(SheetdashError::Config(format!(
                    "Timeout of {timeout} seconds is extremely large (>24 hours). Consider using a smaller value."
                )));
            }
        }

        if self.port == Some(0) {
            return Err(SheetdashError::Config(
                "Port cannot be 0. Expected a number between 1-65535.".to_string(),
            ));
        }

        if let Some(ref blob) = self.blob_name
            && blob.trim().is_empty()
        {
            return Err(SheetdashError::Config(
                "Blob name cannot be empty.".to_string(),
            ));
        }

        let named_columns = [
            ("group_column", &self.group_column),
            ("status_column", &self.status_column),
            ("partition_column", &self.partition_column),
            ("outcome_column", &self.outcome_column),
        ];
        for (key, value) in named_columns {
            if let Some(name) = value
                && name.trim().is_empty()
            {
                return Err(SheetdashError::Config(format!(
                    "{key} cannot be empty."
                )));
            }
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub container: Option<String>,
    pub blob_name: Option<String>,
    pub timeout: Option<u64>,
    pub verbose: bool,
    pub quiet: bool,
    pub config_file: Option<String>,
    pub no_config: bool,
}
