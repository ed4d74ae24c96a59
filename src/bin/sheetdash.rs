use clap::Parser;
use sheetdash::cli::{Cli, cli_to_config};
use sheetdash::config::{CliConfig, Config};
use sheetdash::logging;
use sheetdash::server;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Resolve configuration, then serve until shutdown
pub async fn run(cli: &Cli) -> sheetdash::Result<()> {
    let cli_config = cli_to_config(cli);

    let config = load_and_merge_config(&cli_config)?;
    logging::init_logger(config.verbose.unwrap_or(false), cli_config.quiet);

    let settings = config.resolve()?;
    logging::log_config_info(&settings);

    server::serve(settings).await
}

/// Defaults, then config file, then environment, then CLI
pub fn load_and_merge_config(cli_config: &CliConfig) -> sheetdash::Result<Config> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        // Reported by `main`; the logger is not initialized yet
        Config::load_from_file(config_file)?
    } else {
        Config::load_from_standard_locations()
    };

    config.merge_with_env()?;
    config.merge_with_cli(cli_config);
    Ok(config)
}
