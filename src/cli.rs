// Command-line interface definitions for sheetdash

use crate::config::CliConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // Server
    /// Port to listen on (default: $PORT, then 8501)
    #[arg(short = 'p', long, value_name = "PORT", help_heading = "Server")]
    pub port: Option<u16>,

    /// Address to bind (default: 0.0.0.0)
    #[arg(long, value_name = "ADDR", help_heading = "Server")]
    pub host: Option<String>,

    // Storage
    /// Blob container holding the spreadsheet (default: $AZURE_BLOB_CONTAINER)
    #[arg(long, value_name = "NAME", help_heading = "Storage")]
    pub container: Option<String>,

    /// Spreadsheet object name (default: merged_data.xlsx)
    #[arg(long, value_name = "NAME", help_heading = "Storage")]
    pub blob: Option<String>,

    /// Download timeout in seconds (default: 30)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        help_heading = "Storage"
    )]
    pub timeout: Option<u64>,

    // Output & Verbosity
    /// Only log warnings and errors
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

/// Convert parsed arguments into the CLI layer of the configuration
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        port: cli.port,
        host: cli.host.clone(),
        container: cli.container.clone(),
        blob_name: cli.blob.clone(),
        timeout: cli.timeout,
        verbose: cli.verbose,
        quiet: cli.quiet,
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    }
}
