//! mapconf - validate and inspect map renderer configuration files

use clap::Parser;
use mapconf::{
    cli::{run_cli, MapconfCli},
    logging::{init_logging, LogConfig},
    MapconfError, Result,
};
use tracing::info;

fn main() -> Result<()> {
    let cli = MapconfCli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose().with_env_overrides()
    } else {
        LogConfig::from_env()
    };
    init_logging(&log_config).map_err(|e| {
        MapconfError::ConfigurationError(format!("Failed to initialize logging: {}", e))
    })?;

    info!("mapconf v{}", env!("CARGO_PKG_VERSION"));

    if !run_cli(cli)? {
        std::process::exit(1);
    }

    Ok(())
}
