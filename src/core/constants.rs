/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes the literal values shared between the loader,
/// the chart builders and the server.
/// Blob storage constants
pub mod storage {
    /// Object fetched from the configured container
    pub const DEFAULT_BLOB_NAME: &str = "merged_data.xlsx";
    /// Default protocol when a connection string omits `DefaultEndpointsProtocol`
    pub const DEFAULT_PROTOCOL: &str = "https";
    /// Default endpoint suffix for public Azure
    pub const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
    /// REST API version sent in `x-ms-version`
    pub const API_VERSION: &str = "2021-08-06";
    /// Azurite emulator account name
    pub const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
    /// Azurite emulator account key (published by Microsoft, not a secret)
    pub const DEV_ACCOUNT_KEY: &str =
        "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
    /// Azurite emulator blob endpoint
    pub const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";
}

/// Environment variable names read at startup
pub mod env_vars {
    /// Storage connection string
    pub const CONNECTION_STRING: &str = "AZURE_STORAGE_CONNECTION_STRING";
    /// Container holding the spreadsheet
    pub const CONTAINER: &str = "AZURE_BLOB_CONTAINER";
    /// Listening port
    pub const PORT: &str = "PORT";
}

/// Server constants
pub mod server {
    /// Default listening port
    pub const DEFAULT_PORT: u16 = 8501;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Dashboard title shown on every page
    pub const DEFAULT_TITLE: &str = "RMIT Data Dashboard (Azure Blob Storage)";
    /// Config file looked up in the working directory and its parents
    pub const CONFIG_FILE_NAME: &str = ".sheetdash.toml";
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
    /// Maximum accepted timeout in seconds (24 hours)
    pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;
}

/// Default column names of the merged spreadsheet
pub mod columns {
    pub const GROUP: &str = "plan_name";
    pub const STATUS: &str = "enrollment_status";
    pub const PARTITION: &str = "college";
    pub const OUTCOME: &str = "Visa Granted";
}

/// Status and outcome labels
pub mod labels {
    /// Status plotted on the right of the mirrored chart
    pub const ENROLLED: &str = "Enrolled";
    /// Status plotted (negated) on the left of the mirrored chart
    pub const NOT_ENROLLED: &str = "Not Enrolled";
    /// Positive outcome flag value
    pub const YES: &str = "YES";
    /// Negative outcome flag value
    pub const NO: &str = "NO";
}

/// Chart layout constants
pub mod charts {
    /// Number of independently configured selector panels
    pub const PANEL_COUNT: usize = 4;
    /// Rows shown in the data preview
    pub const PREVIEW_ROWS: usize = 10;
    /// Fixed part of the mirrored chart height in pixels
    pub const MIRRORED_BASE_HEIGHT: u32 = 160;
    /// Added height per group in pixels
    pub const MIRRORED_ROW_HEIGHT: u32 = 32;
    /// Height of selector panel charts in pixels
    pub const PANEL_HEIGHT: u32 = 360;
    /// Opacity of the left (negated) series
    pub const LEFT_OPACITY: f64 = 0.6;

    /// Qualitative palette, cycled when groups outnumber colors
    pub const PALETTE: [&str; 10] = [
        "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
        "#FF97FF", "#FECB52",
    ];
}

/// User-facing messages
pub mod messages {
    pub const LOAD_SUCCESS: &str = "Data loaded from Azure Blob";
    pub const NO_DATA: &str = "No data available or failed to load from Azure Blob.";
    pub const EMPTY_SELECTION: &str = "No records match this selection.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_constants() {
        assert_eq!(storage::DEFAULT_BLOB_NAME, "merged_data.xlsx");
        assert_eq!(storage::DEFAULT_PROTOCOL, "https");
        assert!(storage::DEV_BLOB_ENDPOINT.ends_with(storage::DEV_ACCOUNT_NAME));
    }

    #[test]
    fn test_server_constants() {
        assert_eq!(server::DEFAULT_PORT, 8501);
        assert_eq!(env_vars::PORT, "PORT");
    }

    #[test]
    fn test_chart_constants() {
        assert_eq!(charts::PANEL_COUNT, 4);
        assert_eq!(charts::PALETTE.len(), 10);
        assert!(charts::PALETTE.iter().all(|c| c.starts_with('#') && c.len() == 7));
        assert!(charts::LEFT_OPACITY < 1.0);
    }
}
