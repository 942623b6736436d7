use std::process::ExitCode;

use adminhub_cli::logging::init_logging;
use adminhub_cli::{Cli, Commands, Parser};
use adminhub_infra::config;
use anyhow::{Context, Result};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = match cli.command {
        Commands::Config { .. } => config::load_or_default(cli.config.clone()),
        _ => config::load(cli.config.clone()),
    };
    let app_config = loaded.context("failed to load configuration")?;

    let level = cli.log_level.clone().unwrap_or_else(|| app_config.log_level.clone());
    init_logging(&level, cli.log_format.unwrap_or(app_config.log_format));

    cli.command.run(&app_config).await
}
